//! Conversation Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ChatMessage, ConversationSettings, ConversationTurn};
use crate::domain::synthesis::SynthesizedAudioArtifact;

/// 对话状态聚合根
///
/// 由调用方显式传入每一轮处理，不依赖任何全局会话状态。
///
/// 不变量:
/// - 历史只追加，只能整体清空
/// - 不缓存任何合成任务，只保留最近一次音频的引用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    id: String,
    turns: Vec<ConversationTurn>,
    settings: ConversationSettings,
    last_audio: Option<SynthesizedAudioArtifact>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(settings: ConversationSettings) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            turns: Vec::new(),
            settings,
            last_audio: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 追加一轮对话
    pub fn record_turn(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        self.updated_at = Utc::now();
    }

    /// 记录最近一次合成的音频
    pub fn set_last_audio(&mut self, artifact: SynthesizedAudioArtifact) {
        self.last_audio = Some(artifact);
        self.updated_at = Utc::now();
    }

    /// 清空历史和音频引用（不删除磁盘文件）
    pub fn clear(&mut self) {
        self.turns.clear();
        self.last_audio = None;
        self.updated_at = Utc::now();
    }

    pub fn update_settings(&mut self, settings: ConversationSettings) {
        self.settings = settings;
        self.updated_at = Utc::now();
    }

    pub fn toggle_auto_play(&mut self) -> bool {
        self.settings.auto_play = !self.settings.auto_play;
        self.updated_at = Utc::now();
        self.settings.auto_play
    }

    /// 构建语言模型消息序列
    ///
    /// 顺序: system prompt -> 历史 (user, assistant)* -> 最新用户输入
    pub fn chat_messages(&self, system_prompt: &str, latest_user: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.turns.len() * 2 + 2);
        messages.push(ChatMessage::system(system_prompt));
        for turn in &self.turns {
            messages.push(ChatMessage::user(&turn.user_text));
            messages.push(ChatMessage::assistant(&turn.assistant_text));
        }
        messages.push(ChatMessage::user(latest_user));
        messages
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn settings(&self) -> ConversationSettings {
        self.settings
    }

    pub fn last_audio(&self) -> Option<&SynthesizedAudioArtifact> {
        self.last_audio.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
