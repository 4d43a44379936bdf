//! Speech To Text Port - 语音识别抽象

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::synthesis::LanguageHint;

/// 语音识别错误
#[derive(Debug, Error)]
pub enum SttError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Speech To Text Port
#[async_trait]
pub trait SpeechToTextPort: Send + Sync {
    /// 识别 WAV 音频，`language` 为 Auto 时由服务自动检测
    async fn transcribe(&self, audio: Vec<u8>, language: LanguageHint) -> Result<String, SttError>;
}
