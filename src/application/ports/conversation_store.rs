//! Conversation Store Port - 对话状态存储
//!
//! 定义对话状态的抽象接口，具体实现在 infrastructure/memory 层

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::domain::conversation::ConversationState;

/// Conversation Store 错误
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Conversation already exists: {0}")]
    AlreadyExists(String),
}

/// 共享的对话状态句柄。同一对话的轮次通过这把锁串行执行
pub type SharedConversation = Arc<Mutex<ConversationState>>;

/// Conversation Store Port
pub trait ConversationStorePort: Send + Sync {
    /// 保存新对话，返回对话 ID
    fn create(&self, state: ConversationState) -> Result<String, ConversationError>;

    /// 获取对话状态句柄
    fn get(&self, id: &str) -> Result<SharedConversation, ConversationError>;

    /// 开始新一轮处理，返回本轮的取消令牌
    fn begin_turn(&self, id: &str) -> Result<CancellationToken, ConversationError>;

    /// 取消当前轮次的合成
    fn cancel_turn(&self, id: &str) -> Result<(), ConversationError>;

    /// 检查对话是否存在
    fn exists(&self, id: &str) -> bool;

    /// 删除对话（会取消进行中的轮次）
    fn remove(&self, id: &str) -> Result<(), ConversationError>;

    /// 获取所有对话 ID
    fn list_all(&self) -> Vec<String>;
}
