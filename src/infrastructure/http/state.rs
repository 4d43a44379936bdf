//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CancelTurnHandler, ClearConversationHandler, CloseConversationHandler,
    CreateConversationHandler, DeleteAudioHandler, TextTurnHandler, UpdateSettingsHandler,
    VoiceTurnHandler,
    // Query handlers
    GetAudioHandler, GetConversationHandler, ListConversationsHandler,
    // Ports
    AudioStoragePort, ConversationStorePort,
    // Pipeline
    TurnPipeline,
};
use crate::infrastructure::events::EventPublisher;

/// 默认录音上传上限 10MB
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub conversation_store: Arc<dyn ConversationStorePort>,
    pub audio_storage: Arc<dyn AudioStoragePort>,
    pub event_publisher: Arc<EventPublisher>,

    /// 录音上传上限（字节）
    pub max_upload_size: usize,

    // ========== Command Handlers ==========
    pub create_conversation_handler: CreateConversationHandler,
    pub update_settings_handler: UpdateSettingsHandler,
    pub clear_conversation_handler: ClearConversationHandler,
    pub close_conversation_handler: CloseConversationHandler,
    pub text_turn_handler: TextTurnHandler,
    pub voice_turn_handler: VoiceTurnHandler,
    pub cancel_turn_handler: CancelTurnHandler,
    pub delete_audio_handler: DeleteAudioHandler,

    // ========== Query Handlers ==========
    pub get_conversation_handler: GetConversationHandler,
    pub list_conversations_handler: ListConversationsHandler,
    pub get_audio_handler: GetAudioHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        conversation_store: Arc<dyn ConversationStorePort>,
        audio_storage: Arc<dyn AudioStoragePort>,
        pipeline: Arc<TurnPipeline>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            // Ports
            conversation_store: conversation_store.clone(),
            audio_storage: audio_storage.clone(),
            event_publisher: event_publisher.clone(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,

            // Command handlers
            create_conversation_handler: CreateConversationHandler::new(conversation_store.clone()),
            update_settings_handler: UpdateSettingsHandler::new(conversation_store.clone()),
            clear_conversation_handler: ClearConversationHandler::new(
                conversation_store.clone(),
                event_publisher.clone(),
            ),
            close_conversation_handler: CloseConversationHandler::new(
                conversation_store.clone(),
                event_publisher.clone(),
            ),
            text_turn_handler: TextTurnHandler::new(conversation_store.clone(), pipeline.clone()),
            voice_turn_handler: VoiceTurnHandler::new(conversation_store.clone(), pipeline),
            cancel_turn_handler: CancelTurnHandler::new(conversation_store.clone()),
            delete_audio_handler: DeleteAudioHandler::new(audio_storage.clone()),

            // Query handlers
            get_conversation_handler: GetConversationHandler::new(conversation_store.clone()),
            list_conversations_handler: ListConversationsHandler::new(conversation_store),
            get_audio_handler: GetAudioHandler::new(audio_storage),
        }
    }

    /// 设置录音上传上限
    pub fn with_max_upload_size(mut self, max_upload_size: usize) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }
}
