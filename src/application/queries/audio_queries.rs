//! Audio Queries - 音频查询

use std::path::PathBuf;

/// 获取合成音频
#[derive(Debug, Clone)]
pub struct GetAudioQuery {
    pub file_name: String,
}

/// 获取音频响应，内容由 HTTP 层按路径流式读取
#[derive(Debug, Clone)]
pub struct GetAudioResponse {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub content_type: String,
}
