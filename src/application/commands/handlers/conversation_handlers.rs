//! Conversation Command Handlers

use std::sync::Arc;

use crate::application::commands::conversation_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::ConversationStorePort;
use crate::domain::conversation::{ConversationSettings, ConversationState};
use crate::infrastructure::events::EventPublisher;

/// CreateConversation Handler - 创建对话
pub struct CreateConversationHandler {
    store: Arc<dyn ConversationStorePort>,
}

impl CreateConversationHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>) -> Self {
        Self { store }
    }

    pub fn handle(
        &self,
        cmd: CreateConversationCommand,
    ) -> Result<CreateConversationResponse, ApplicationError> {
        let defaults = ConversationSettings::default();
        let settings = ConversationSettings {
            speech_language: cmd.speech_language.unwrap_or(defaults.speech_language),
            auto_play: cmd.auto_play.unwrap_or(defaults.auto_play),
        };

        let conversation_id = self.store.create(ConversationState::new(settings))?;

        tracing::info!(
            conversation_id = %conversation_id,
            speech_language = %settings.speech_language,
            auto_play = settings.auto_play,
            "Conversation started"
        );

        Ok(CreateConversationResponse {
            conversation_id,
            settings,
        })
    }
}

/// UpdateSettings Handler - 更新识别语言 / 自动播放
pub struct UpdateSettingsHandler {
    store: Arc<dyn ConversationStorePort>,
}

impl UpdateSettingsHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSettingsCommand,
    ) -> Result<UpdateSettingsResponse, ApplicationError> {
        let shared = self.store.get(&cmd.conversation_id)?;
        let mut state = shared.lock().await;

        let mut settings = state.settings();
        if let Some(language) = cmd.speech_language {
            settings.speech_language = language;
        }
        if let Some(auto_play) = cmd.auto_play {
            settings.auto_play = auto_play;
        }
        state.update_settings(settings);
        if cmd.toggle_auto_play {
            state.toggle_auto_play();
        }

        tracing::debug!(
            conversation_id = %cmd.conversation_id,
            speech_language = %state.settings().speech_language,
            auto_play = state.settings().auto_play,
            "Conversation settings updated"
        );

        Ok(UpdateSettingsResponse {
            conversation_id: cmd.conversation_id,
            settings: state.settings(),
        })
    }
}

/// ClearConversation Handler - 清空历史
///
/// 不删除磁盘上的音频文件
pub struct ClearConversationHandler {
    store: Arc<dyn ConversationStorePort>,
    event_publisher: Arc<EventPublisher>,
}

impl ClearConversationHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>, event_publisher: Arc<EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub async fn handle(&self, cmd: ClearConversationCommand) -> Result<(), ApplicationError> {
        let shared = self.store.get(&cmd.conversation_id)?;
        let cleared = {
            let mut state = shared.lock().await;
            let count = state.turns().len();
            state.clear();
            count
        };

        self.event_publisher
            .publish_conversation_cleared(&cmd.conversation_id);

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            cleared_turns = cleared,
            "Conversation cleared"
        );
        Ok(())
    }
}

/// CloseConversation Handler - 关闭对话
pub struct CloseConversationHandler {
    store: Arc<dyn ConversationStorePort>,
    event_publisher: Arc<EventPublisher>,
}

impl CloseConversationHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>, event_publisher: Arc<EventPublisher>) -> Self {
        Self {
            store,
            event_publisher,
        }
    }

    pub fn handle(&self, cmd: CloseConversationCommand) -> Result<(), ApplicationError> {
        // 同时取消进行中的轮次
        self.store.remove(&cmd.conversation_id)?;

        self.event_publisher
            .publish_conversation_closed(&cmd.conversation_id, "client_close");
        self.event_publisher
            .unregister_conversation(&cmd.conversation_id);

        Ok(())
    }
}
