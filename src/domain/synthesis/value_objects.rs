//! Synthesis Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::SynthesisRequestError;

/// 默认音色（韩语女声）
pub const DEFAULT_ACTOR_ID: &str = "606c6b127b9f53b4cd1743f5";

/// 语言提示
///
/// 同时用于语音识别（Auto 表示自动检测）和语音合成的 `lang` 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageHint {
    #[default]
    Auto,
    Ko,
    En,
}

impl LanguageHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Ko => "ko",
            Self::En => "en",
        }
    }

    /// 语音识别使用的语言代码，自动检测时为 None
    pub fn language_code(&self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Ko => Some("ko"),
            Self::En => Some("en"),
        }
    }

    /// 解析语言名称，接受代码和显示名称
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" | "auto-detect" | "" => Some(Self::Auto),
            "ko" | "korean" => Some(Self::Ko),
            "en" | "english" => Some(Self::En),
            _ => None,
        }
    }
}

impl std::fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 音色参数
///
/// 每轮对话用这些参数和助手回复文本构建 SynthesisRequest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// 音色 ID
    pub actor_id: String,
    /// 合成语言
    pub language: LanguageHint,
    /// 高清音质
    pub hd: bool,
    /// 语速倍率
    pub speed: f32,
    /// 音量百分比 (0 - 100)
    pub volume: u8,
    /// 音调偏移
    pub pitch: i32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            actor_id: DEFAULT_ACTOR_ID.to_string(),
            language: LanguageHint::Auto,
            hd: true,
            speed: 1.1,
            volume: 100,
            pitch: 0,
        }
    }
}

impl VoiceSettings {
    pub fn validate(&self) -> Result<(), SynthesisRequestError> {
        if self.actor_id.trim().is_empty() {
            return Err(SynthesisRequestError::EmptyActorId);
        }
        if self.volume > 100 {
            return Err(SynthesisRequestError::InvalidVolume(self.volume));
        }
        if !(self.speed > 0.0) {
            return Err(SynthesisRequestError::InvalidSpeed(self.speed));
        }
        Ok(())
    }
}

/// 语音合成请求
///
/// 不变量:
/// - 文本非空
/// - 构建后不可修改
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    text: String,
    language_hint: LanguageHint,
    voice_actor_id: String,
    audio_quality_hd: bool,
    speed: f32,
    volume: u8,
    pitch: i32,
}

impl SynthesisRequest {
    pub fn new(
        text: impl Into<String>,
        voice: &VoiceSettings,
    ) -> Result<Self, SynthesisRequestError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SynthesisRequestError::EmptyText);
        }
        voice.validate()?;

        Ok(Self {
            text,
            language_hint: voice.language,
            voice_actor_id: voice.actor_id.clone(),
            audio_quality_hd: voice.hd,
            speed: voice.speed,
            volume: voice.volume,
            pitch: voice.pitch,
        })
    }

    // Getters
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_hint(&self) -> LanguageHint {
        self.language_hint
    }

    pub fn voice_actor_id(&self) -> &str {
        &self.voice_actor_id
    }

    pub fn audio_quality_hd(&self) -> bool {
        self.audio_quality_hd
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn pitch(&self) -> i32 {
        self.pitch
    }
}

/// 合成任务句柄（状态轮询 URL）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 单次轮询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    /// 任务未完成（包括未知状态）
    Pending,
    /// 任务完成，附带音频下载地址（可能缺失）
    Done { audio_url: Option<String> },
    /// 响应体无法解析
    Malformed,
}

impl PollResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// 合成音频产物
///
/// 由调用方决定保留或删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedAudioArtifact {
    local_path: PathBuf,
    source_text: String,
    created_at: DateTime<Utc>,
    size_bytes: u64,
}

impl SynthesizedAudioArtifact {
    pub fn new(local_path: PathBuf, source_text: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            local_path,
            source_text: source_text.into(),
            created_at: Utc::now(),
            size_bytes,
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// 文件名（用于 HTTP 下载地址）
    pub fn file_name(&self) -> Option<&str> {
        self.local_path.file_name().and_then(|n| n.to_str())
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}
