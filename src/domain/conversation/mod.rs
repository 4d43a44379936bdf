//! Conversation Context - 对话限界上下文
//!
//! 职责:
//! - 对话历史（只追加）
//! - 对话设置（识别语言、自动播放）
//! - 构建发给语言模型的消息序列

mod aggregate;
mod value_objects;

pub use aggregate::ConversationState;
pub use value_objects::{ChatMessage, ChatRole, ConversationSettings, ConversationTurn};
