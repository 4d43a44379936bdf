//! Data Transfer Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{ConversationView, TurnOutcome, VoiceTurnOutcome};
use crate::domain::conversation::{ConversationSettings, ConversationTurn};
use crate::domain::synthesis::{LanguageHint, SynthesizedAudioArtifact};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize, Deserialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

/// 合成音频的下载地址
pub fn audio_url(file_name: &str) -> String {
    format!("/api/audio/{}", file_name)
}

// ============================================================================
// Conversation DTOs
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub speech_language: Option<LanguageHint>,
    #[serde(default)]
    pub auto_play: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationIdRequest {
    pub conversation_id: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub conversation_id: String,
    #[serde(default)]
    pub speech_language: Option<LanguageHint>,
    #[serde(default)]
    pub auto_play: Option<bool>,
    /// 切换自动播放，优先于 `auto_play`
    #[serde(default)]
    pub toggle_auto_play: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationSettingsDto {
    pub conversation_id: String,
    pub speech_language: LanguageHint,
    pub auto_play: bool,
}

impl ConversationSettingsDto {
    pub fn new(conversation_id: String, settings: ConversationSettings) -> Self {
        Self {
            conversation_id,
            speech_language: settings.speech_language,
            auto_play: settings.auto_play,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationDto {
    pub conversation_id: String,
    pub turns: Vec<ConversationTurn>,
    pub speech_language: LanguageHint,
    pub auto_play: bool,
    pub last_audio: Option<AudioDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ConversationView> for ConversationDto {
    fn from(view: ConversationView) -> Self {
        Self {
            conversation_id: view.conversation_id,
            turns: view.turns,
            speech_language: view.settings.speech_language,
            auto_play: view.settings.auto_play,
            last_audio: view.last_audio.map(|file_name| AudioDto {
                url: audio_url(&file_name),
                file_name,
                size_bytes: None,
            }),
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}

// ============================================================================
// Turn DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TextTurnRequest {
    pub conversation_id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AudioDto {
    pub file_name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

impl AudioDto {
    fn from_artifact(artifact: &SynthesizedAudioArtifact) -> Option<Self> {
        let file_name = artifact.file_name()?.to_string();
        Some(Self {
            url: audio_url(&file_name),
            file_name,
            size_bytes: Some(artifact.size_bytes()),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnResponseDto {
    pub conversation_id: String,
    pub user_text: String,
    pub reply: String,
    pub via_speech: bool,
    pub chat_failed: bool,
    pub audio: Option<AudioDto>,
    /// 合成失败时的提示文本
    pub notice: Option<String>,
    pub synthesis_error: Option<String>,
}

impl TurnResponseDto {
    pub fn new(conversation_id: String, outcome: TurnOutcome) -> Self {
        Self {
            conversation_id,
            notice: outcome.notice().map(String::from),
            audio: outcome.audio.as_ref().and_then(AudioDto::from_artifact),
            user_text: outcome.user_text,
            reply: outcome.reply,
            via_speech: outcome.via_speech,
            chat_failed: outcome.chat_failed,
            synthesis_error: outcome.synthesis_error,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceTurnResponseDto {
    pub conversation_id: String,
    pub transcript: Option<String>,
    pub transcription_error: Option<String>,
    pub turn: Option<TurnResponseDto>,
}

impl VoiceTurnResponseDto {
    pub fn new(conversation_id: String, outcome: VoiceTurnOutcome) -> Self {
        Self {
            turn: outcome
                .turn
                .map(|turn| TurnResponseDto::new(conversation_id.clone(), turn)),
            conversation_id,
            transcript: outcome.transcript,
            transcription_error: outcome.transcription_error,
        }
    }
}

// ============================================================================
// Audio DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DeleteAudioRequest {
    pub file_name: String,
}
