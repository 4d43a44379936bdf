//! STT Adapters - 语音识别适配器

mod whisper_client;

pub use whisper_client::{WhisperClient, WhisperClientConfig};
