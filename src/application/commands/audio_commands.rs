//! Audio Commands - 合成音频文件管理

/// 删除合成音频
#[derive(Debug, Clone)]
pub struct DeleteAudioCommand {
    pub file_name: String,
}
