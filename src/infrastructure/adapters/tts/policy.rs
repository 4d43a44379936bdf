//! Poll Policy - 轮询重试策略
//!
//! 最大轮询次数、基础间隔和退避方式，作为对象注入轮询器。
//! 测试中使用零间隔，无需真实等待。

use serde::Deserialize;
use std::time::Duration;

/// 退避方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    /// 固定间隔
    #[default]
    Fixed,
    /// 指数退避，间隔每次翻倍，不超过 max_interval
    Exponential,
}

/// 轮询策略
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub backoff: Backoff,
    pub max_interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(1),
            backoff: Backoff::Fixed,
            max_interval: Duration::from_secs(10),
        }
    }
}

impl PollPolicy {
    pub fn fixed(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            backoff: Backoff::Fixed,
            max_interval: interval,
        }
    }

    pub fn exponential(max_attempts: u32, interval: Duration, max_interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            backoff: Backoff::Exponential,
            max_interval,
        }
    }

    /// 零间隔
    pub fn immediate(max_attempts: u32) -> Self {
        Self::fixed(max_attempts, Duration::ZERO)
    }

    /// 第 `attempt` 次（从 1 开始）轮询未完成后的等待时间
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential => {
                let exp = attempt.saturating_sub(1).min(16);
                self.interval
                    .saturating_mul(1u32 << exp)
                    .min(self.max_interval)
            }
        }
    }

    /// 最坏情况下的总等待时间（最后一次轮询后不再等待）
    pub fn worst_case_wait(&self) -> Duration {
        (1..self.max_attempts)
            .map(|attempt| self.delay_after(attempt))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(29), Duration::from_secs(1));
        assert_eq!(policy.worst_case_wait(), Duration::from_secs(29));
    }

    #[test]
    fn test_exponential_backoff_is_capped() {
        let policy =
            PollPolicy::exponential(10, Duration::from_millis(500), Duration::from_secs(3));
        assert_eq!(policy.delay_after(1), Duration::from_millis(500));
        assert_eq!(policy.delay_after(2), Duration::from_secs(1));
        assert_eq!(policy.delay_after(3), Duration::from_secs(2));
        assert_eq!(policy.delay_after(4), Duration::from_secs(3));
        assert_eq!(policy.delay_after(100), Duration::from_secs(3));
    }

    #[test]
    fn test_immediate_policy() {
        let policy = PollPolicy::immediate(5);
        assert_eq!(policy.delay_after(3), Duration::ZERO);
        assert_eq!(policy.worst_case_wait(), Duration::ZERO);
    }

    #[test]
    fn test_backoff_deserialize() {
        let backoff: Backoff = serde_json::from_str("\"exponential\"").unwrap();
        assert_eq!(backoff, Backoff::Exponential);
    }
}
