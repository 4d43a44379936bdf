//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Synthesis Context: 语音合成请求与产物
//! - Conversation Context: 对话状态与轮次

pub mod conversation;
pub mod synthesis;
