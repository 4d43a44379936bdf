//! Speech Synthesizer Port - 语音合成抽象
//!
//! 定义提交/轮询/下载三阶段的错误分类和合成接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::synthesis::{SynthesisRequest, SynthesizedAudioArtifact};

/// 提交阶段错误
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Submit transport error (status {status:?}): {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Speak URL missing in synthesis response")]
    HandleMissing,
}

/// 轮询与下载阶段错误
///
/// 所有变体对当前轮次都是终止性的，不会自动重新提交
#[derive(Debug, Error)]
pub enum PollError {
    #[error("Poll transport error (status {status:?}): {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("audio_download_url missing in completed job")]
    AudioUrlMissing,

    #[error("Audio download failed (status {status:?}): {message}")]
    DownloadFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Exceeded maximum polling attempts ({0})")]
    Timeout(u32),

    #[error("Polling cancelled")]
    Cancelled,
}

/// 语音合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Invalid synthesis request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Synthesizer configuration error: {0}")]
    Configuration(String),
}

/// 轮询进度
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollProgress {
    /// 已完成的轮询次数
    pub attempt: u32,
    pub max_attempts: u32,
    /// 0.0 - 1.0
    pub fraction: f32,
}

impl PollProgress {
    /// 第 `attempt` 次轮询未完成后的进度
    pub fn after_attempt(attempt: u32, max_attempts: u32) -> Self {
        let fraction = if max_attempts == 0 {
            1.0
        } else {
            (attempt as f32 / max_attempts as f32).min(1.0)
        };
        Self {
            attempt,
            max_attempts,
            fraction,
        }
    }

    /// 完成或超时，进度固定为 1.0
    pub fn finished(attempt: u32, max_attempts: u32) -> Self {
        Self {
            attempt,
            max_attempts,
            fraction: 1.0,
        }
    }
}

/// 轮询进度观察者
pub trait ProgressReporter: Send + Sync {
    fn report(&self, progress: PollProgress);
}

/// 忽略进度
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _progress: PollProgress) {}
}

/// 单次合成的调用上下文
#[derive(Clone)]
pub struct SynthesisContext {
    pub progress: Arc<dyn ProgressReporter>,
    pub cancel: CancellationToken,
}

impl SynthesisContext {
    pub fn new(progress: Arc<dyn ProgressReporter>, cancel: CancellationToken) -> Self {
        Self { progress, cancel }
    }

    /// 无进度观察、不会被取消的上下文
    pub fn detached() -> Self {
        Self {
            progress: Arc::new(NoopProgress),
            cancel: CancellationToken::new(),
        }
    }
}

/// Speech Synthesizer Port
///
/// 提交 -> 轮询 -> 下载 -> 落盘，成功时返回本地音频产物
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
        ctx: &SynthesisContext,
    ) -> Result<SynthesizedAudioArtifact, SynthesisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_fraction() {
        assert_eq!(PollProgress::after_attempt(0, 30).fraction, 0.0);
        assert_eq!(PollProgress::after_attempt(15, 30).fraction, 0.5);
        assert_eq!(PollProgress::after_attempt(40, 30).fraction, 1.0);
        assert_eq!(PollProgress::after_attempt(0, 0).fraction, 1.0);
        assert_eq!(PollProgress::finished(3, 30).fraction, 1.0);
    }

    #[test]
    fn test_error_wrapping() {
        let err: SynthesisError = PollError::Timeout(30).into();
        assert_eq!(err.to_string(), "Exceeded maximum polling attempts (30)");

        let err: SynthesisError = SubmitError::HandleMissing.into();
        assert!(matches!(err, SynthesisError::Submit(SubmitError::HandleMissing)));
    }
}
