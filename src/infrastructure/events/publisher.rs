//! Event Publisher Implementation
//!
//! WebSocket 事件推送实现

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{PollProgress, ProgressReporter};

/// WebSocket 事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum WsEvent {
    /// 开始合成回复
    SynthesisStarted { conversation_id: String },
    /// 轮询进度
    SynthesisProgress {
        conversation_id: String,
        attempt: u32,
        max_attempts: u32,
        progress: f32,
    },
    /// 音频就绪
    SynthesisReady {
        conversation_id: String,
        file_name: String,
    },
    /// 合成失败，文本回复不受影响
    SynthesisFailed {
        conversation_id: String,
        error: String,
    },
    /// 历史已清空
    ConversationCleared { conversation_id: String },
    /// 对话关闭
    ConversationClosed {
        conversation_id: String,
        reason: String,
    },
}

/// 事件发布器
pub struct EventPublisher {
    /// conversation_id -> broadcast sender
    conversation_channels: DashMap<String, broadcast::Sender<WsEvent>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            conversation_channels: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 注册对话的事件通道
    ///
    /// 并发注册共享同一个 sender
    pub fn register_conversation(&self, conversation_id: &str) -> broadcast::Receiver<WsEvent> {
        self.conversation_channels
            .entry(conversation_id.to_string())
            .or_insert_with(|| broadcast::channel(100).0)
            .subscribe()
    }

    /// 取消注册对话
    pub fn unregister_conversation(&self, conversation_id: &str) {
        self.conversation_channels.remove(conversation_id);
    }

    /// 没有订阅者时释放通道
    pub fn release_conversation(&self, conversation_id: &str) {
        self.conversation_channels
            .remove_if(conversation_id, |_, sender| sender.receiver_count() == 0);
    }

    /// 获取对话的事件接收器
    pub fn subscribe(&self, conversation_id: &str) -> Option<broadcast::Receiver<WsEvent>> {
        self.conversation_channels
            .get(conversation_id)
            .map(|s| s.subscribe())
    }

    pub fn publish_synthesis_started(&self, conversation_id: &str) {
        self.publish(
            conversation_id,
            WsEvent::SynthesisStarted {
                conversation_id: conversation_id.to_string(),
            },
        );
    }

    pub fn publish_synthesis_progress(&self, conversation_id: &str, progress: PollProgress) {
        self.publish(
            conversation_id,
            WsEvent::SynthesisProgress {
                conversation_id: conversation_id.to_string(),
                attempt: progress.attempt,
                max_attempts: progress.max_attempts,
                progress: progress.fraction,
            },
        );
    }

    pub fn publish_synthesis_ready(&self, conversation_id: &str, file_name: &str) {
        self.publish(
            conversation_id,
            WsEvent::SynthesisReady {
                conversation_id: conversation_id.to_string(),
                file_name: file_name.to_string(),
            },
        );
    }

    pub fn publish_synthesis_failed(&self, conversation_id: &str, error: &str) {
        self.publish(
            conversation_id,
            WsEvent::SynthesisFailed {
                conversation_id: conversation_id.to_string(),
                error: error.to_string(),
            },
        );
    }

    pub fn publish_conversation_cleared(&self, conversation_id: &str) {
        self.publish(
            conversation_id,
            WsEvent::ConversationCleared {
                conversation_id: conversation_id.to_string(),
            },
        );
    }

    /// 发布对话关闭事件
    pub fn publish_conversation_closed(&self, conversation_id: &str, reason: &str) {
        self.publish(
            conversation_id,
            WsEvent::ConversationClosed {
                conversation_id: conversation_id.to_string(),
                reason: reason.to_string(),
            },
        );
    }

    /// 发布事件到指定对话
    fn publish(&self, conversation_id: &str, event: WsEvent) {
        if let Some(sender) = self.conversation_channels.get(conversation_id) {
            if let Err(e) = sender.send(event) {
                tracing::debug!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "Failed to publish event (no receivers)"
                );
            }
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

/// 把轮询进度转发为对话事件
pub struct ConversationProgressReporter {
    publisher: Arc<EventPublisher>,
    conversation_id: String,
}

impl ConversationProgressReporter {
    pub fn new(publisher: Arc<EventPublisher>, conversation_id: impl Into<String>) -> Self {
        Self {
            publisher,
            conversation_id: conversation_id.into(),
        }
    }
}

impl ProgressReporter for ConversationProgressReporter {
    fn report(&self, progress: PollProgress) {
        self.publisher
            .publish_synthesis_progress(&self.conversation_id, progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = WsEvent::SynthesisReady {
            conversation_id: "c1".to_string(),
            file_name: "speech_1.wav".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "SynthesisReady");
        assert_eq!(json["data"]["file_name"], "speech_1.wav");
    }

    #[tokio::test]
    async fn test_progress_reporter_forwards_events() {
        let publisher = EventPublisher::new().arc();
        let mut rx = publisher.register_conversation("c1");
        let reporter = ConversationProgressReporter::new(publisher.clone(), "c1");

        reporter.report(PollProgress::after_attempt(3, 30));

        match rx.recv().await.unwrap() {
            WsEvent::SynthesisProgress {
                conversation_id,
                attempt,
                max_attempts,
                progress,
            } => {
                assert_eq!(conversation_id, "c1");
                assert_eq!(attempt, 3);
                assert_eq!(max_attempts, 30);
                assert!((progress - 0.1).abs() < 1e-6);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_events_are_scoped_to_conversation() {
        let publisher = EventPublisher::new();
        let mut rx_a = publisher.register_conversation("a");
        let _rx_b = publisher.register_conversation("b");

        publisher.publish_conversation_cleared("b");
        publisher.publish_synthesis_started("a");

        assert_eq!(
            rx_a.recv().await.unwrap(),
            WsEvent::SynthesisStarted {
                conversation_id: "a".to_string()
            }
        );
        assert!(rx_a.try_recv().is_err());
    }

    #[test]
    fn test_release_keeps_channel_while_subscribed() {
        let publisher = EventPublisher::new();
        let rx_a = publisher.register_conversation("c1");
        let rx_b = publisher.register_conversation("c1");

        drop(rx_a);
        publisher.release_conversation("c1");
        assert!(publisher.subscribe("c1").is_some());

        drop(rx_b);
        publisher.release_conversation("c1");
        assert!(publisher.subscribe("c1").is_none());
    }

    #[test]
    fn test_publish_without_channel_is_noop() {
        let publisher = EventPublisher::new();
        publisher.publish_synthesis_failed("missing", "boom");
        assert!(publisher.subscribe("missing").is_none());
    }

    #[test]
    fn test_concurrent_registration_shares_sender() {
        const SUBSCRIBERS: usize = 8;

        let publisher = Arc::new(EventPublisher::new());
        for round in 0..200 {
            let conversation_id = format!("c{}", round);
            let barrier = Arc::new(std::sync::Barrier::new(SUBSCRIBERS));

            let workers: Vec<_> = (0..SUBSCRIBERS)
                .map(|_| {
                    let publisher = publisher.clone();
                    let barrier = barrier.clone();
                    let conversation_id = conversation_id.clone();
                    std::thread::spawn(move || {
                        barrier.wait();
                        publisher.register_conversation(&conversation_id)
                    })
                })
                .collect();
            let mut receivers: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

            publisher.publish_synthesis_started(&conversation_id);
            for rx in receivers.iter_mut() {
                assert!(
                    matches!(rx.try_recv(), Ok(WsEvent::SynthesisStarted { .. })),
                    "every subscriber of round {} must receive the event",
                    round
                );
            }
        }
    }
}
