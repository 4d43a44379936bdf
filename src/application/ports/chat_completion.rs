//! Chat Completion Port - 语言模型对话抽象

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::ChatMessage;

/// 对话补全错误
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Chat Completion Port
///
/// 单次阻塞式请求：消息序列进，助手回复文本出
#[async_trait]
pub trait ChatCompletionPort: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatError>;
}
