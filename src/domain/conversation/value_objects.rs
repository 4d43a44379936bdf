//! Conversation Context - Value Objects

use serde::{Deserialize, Serialize};

use crate::domain::synthesis::LanguageHint;

/// 一轮对话
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_text: String,
    pub assistant_text: String,
    /// 用户输入是否来自语音识别
    #[serde(default)]
    pub via_speech: bool,
}

impl ConversationTurn {
    pub fn new(user_text: impl Into<String>, assistant_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: assistant_text.into(),
            via_speech: false,
        }
    }

    pub fn spoken(mut self) -> Self {
        self.via_speech = true;
        self
    }
}

/// 对话设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSettings {
    /// 语音识别语言
    pub speech_language: LanguageHint,
    /// 合成完成后客户端是否自动播放
    pub auto_play: bool,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            speech_language: LanguageHint::Auto,
            auto_play: true,
        }
    }
}

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// 发给语言模型的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
