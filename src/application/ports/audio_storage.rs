//! Audio Storage Port - 出站端口
//!
//! 定义合成音频文件存储的抽象接口。只有目录本身作为持久化记录，不维护索引，也不做自动清理。

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// 音频存储错误
#[derive(Debug, Error)]
pub enum AudioStorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Audio Storage Port - 出站端口
#[async_trait]
pub trait AudioStoragePort: Send + Sync {
    /// 根据文件名获取路径（会校验文件名）
    fn audio_path(&self, file_name: &str) -> Result<PathBuf, AudioStorageError>;

    /// 保存音频数据，返回新文件路径。每次调用生成不同的文件名
    async fn save_audio(&self, data: &[u8]) -> Result<PathBuf, AudioStorageError>;

    /// 读取音频数据
    async fn read_audio(&self, file_name: &str) -> Result<Vec<u8>, AudioStorageError>;

    /// 删除音频文件
    async fn delete_audio(&self, file_name: &str) -> Result<(), AudioStorageError>;
}
