//! Conversation Query Handlers

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::ConversationStorePort;
use crate::application::queries::{GetConversationQuery, ListConversationsQuery};
use crate::domain::conversation::{ConversationSettings, ConversationState, ConversationTurn};

// ============================================================================
// Response DTOs
// ============================================================================

/// 对话详情
#[derive(Debug, Clone)]
pub struct ConversationView {
    pub conversation_id: String,
    pub turns: Vec<ConversationTurn>,
    pub settings: ConversationSettings,
    /// 最近一次合成的音频文件名
    pub last_audio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ConversationState> for ConversationView {
    fn from(state: &ConversationState) -> Self {
        Self {
            conversation_id: state.id().to_string(),
            turns: state.turns().to_vec(),
            settings: state.settings(),
            last_audio: state
                .last_audio()
                .and_then(|a| a.file_name())
                .map(String::from),
            created_at: state.created_at(),
            updated_at: state.updated_at(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GetConversation Handler
///
/// 需要对话锁，轮次进行中时会等待本轮结束
pub struct GetConversationHandler {
    store: Arc<dyn ConversationStorePort>,
}

impl GetConversationHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetConversationQuery) -> Result<ConversationView, ApplicationError> {
        let shared = self.store.get(&query.conversation_id)?;
        let state = shared.lock().await;
        Ok(ConversationView::from(&*state))
    }
}

/// ListConversations Handler
pub struct ListConversationsHandler {
    store: Arc<dyn ConversationStorePort>,
}

impl ListConversationsHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>) -> Self {
        Self { store }
    }

    pub fn handle(&self, _query: ListConversationsQuery) -> Vec<String> {
        let mut ids = self.store.list_all();
        ids.sort();
        ids
    }
}
