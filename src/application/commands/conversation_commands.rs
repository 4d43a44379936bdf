//! Conversation Commands - 对话相关命令

use crate::domain::conversation::ConversationSettings;
use crate::domain::synthesis::LanguageHint;

/// 创建对话命令
#[derive(Debug, Clone, Default)]
pub struct CreateConversationCommand {
    pub speech_language: Option<LanguageHint>,
    pub auto_play: Option<bool>,
}

/// 创建对话响应
#[derive(Debug, Clone)]
pub struct CreateConversationResponse {
    pub conversation_id: String,
    pub settings: ConversationSettings,
}

/// 更新设置命令
///
/// `toggle_auto_play` 在 `auto_play` 之后生效
#[derive(Debug, Clone, Default)]
pub struct UpdateSettingsCommand {
    pub conversation_id: String,
    pub speech_language: Option<LanguageHint>,
    pub auto_play: Option<bool>,
    pub toggle_auto_play: bool,
}

/// 更新设置响应
#[derive(Debug, Clone)]
pub struct UpdateSettingsResponse {
    pub conversation_id: String,
    pub settings: ConversationSettings,
}

/// 清空历史命令
#[derive(Debug, Clone)]
pub struct ClearConversationCommand {
    pub conversation_id: String,
}

/// 关闭对话命令
#[derive(Debug, Clone)]
pub struct CloseConversationCommand {
    pub conversation_id: String,
}
