//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

use crate::application::ports::{AudioStorageError, ConversationError};

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 资源冲突
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<ConversationError> for ApplicationError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::NotFound(id) => Self::not_found("Conversation", id),
            ConversationError::AlreadyExists(id) => {
                Self::Conflict(format!("Conversation already exists: {}", id))
            }
        }
    }
}

impl From<AudioStorageError> for ApplicationError {
    fn from(err: AudioStorageError) -> Self {
        match err {
            AudioStorageError::FileNotFound(name) => Self::not_found("Audio", name),
            AudioStorageError::InvalidFileName(name) => {
                Self::validation(format!("Invalid audio file name: {}", name))
            }
            AudioStorageError::IoError(msg) => Self::StorageError(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let err: ApplicationError = ConversationError::NotFound("c1".to_string()).into();
        assert_eq!(err.to_string(), "Conversation not found: c1");

        let err: ApplicationError = AudioStorageError::InvalidFileName("../x".to_string()).into();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err: ApplicationError = AudioStorageError::FileNotFound("speech_1.wav".to_string()).into();
        assert!(matches!(
            err,
            ApplicationError::NotFound {
                resource_type: "Audio",
                ..
            }
        ));
    }
}
