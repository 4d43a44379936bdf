//! In-Memory Conversation Store Implementation

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ConversationError, ConversationStorePort, SharedConversation};
use crate::domain::conversation::ConversationState;

struct ConversationEntry {
    state: SharedConversation,
    /// 当前轮次的取消令牌
    turn: CancellationToken,
}

/// 内存对话存储
pub struct InMemoryConversationStore {
    conversations: DashMap<String, ConversationEntry>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStorePort for InMemoryConversationStore {
    fn create(&self, state: ConversationState) -> Result<String, ConversationError> {
        let id = state.id().to_string();
        if self.conversations.contains_key(&id) {
            return Err(ConversationError::AlreadyExists(id));
        }
        self.conversations.insert(
            id.clone(),
            ConversationEntry {
                state: Arc::new(Mutex::new(state)),
                turn: CancellationToken::new(),
            },
        );
        tracing::info!(conversation_id = %id, "Conversation created");
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<SharedConversation, ConversationError> {
        self.conversations
            .get(id)
            .map(|e| e.state.clone())
            .ok_or_else(|| ConversationError::NotFound(id.to_string()))
    }

    fn begin_turn(&self, id: &str) -> Result<CancellationToken, ConversationError> {
        let mut entry = self
            .conversations
            .get_mut(id)
            .ok_or_else(|| ConversationError::NotFound(id.to_string()))?;
        entry.turn = CancellationToken::new();
        Ok(entry.turn.clone())
    }

    fn cancel_turn(&self, id: &str) -> Result<(), ConversationError> {
        let entry = self
            .conversations
            .get(id)
            .ok_or_else(|| ConversationError::NotFound(id.to_string()))?;
        entry.turn.cancel();
        tracing::info!(conversation_id = %id, "Turn cancelled");
        Ok(())
    }

    fn exists(&self, id: &str) -> bool {
        self.conversations.contains_key(id)
    }

    fn remove(&self, id: &str) -> Result<(), ConversationError> {
        self.conversations
            .remove(id)
            .map(|(_, entry)| {
                entry.turn.cancel();
                tracing::info!(conversation_id = %id, "Conversation closed");
            })
            .ok_or_else(|| ConversationError::NotFound(id.to_string()))
    }

    fn list_all(&self) -> Vec<String> {
        self.conversations.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::{ConversationSettings, ConversationTurn};

    #[tokio::test]
    async fn test_conversation_lifecycle() {
        let store = InMemoryConversationStore::new();
        let state = ConversationState::new(ConversationSettings::default());
        let id = store.create(state).unwrap();

        assert!(store.exists(&id));
        assert_eq!(store.list_all(), vec![id.clone()]);

        {
            let shared = store.get(&id).unwrap();
            shared
                .lock()
                .await
                .record_turn(ConversationTurn::new("hi", "hello"));
        }
        assert_eq!(store.get(&id).unwrap().lock().await.turns().len(), 1);

        store.remove(&id).unwrap();
        assert!(!store.exists(&id));
        assert!(matches!(store.get(&id), Err(ConversationError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_create() {
        let store = InMemoryConversationStore::new();
        let state = ConversationState::new(ConversationSettings::default());
        store.create(state.clone()).unwrap();
        assert!(matches!(
            store.create(state),
            Err(ConversationError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_cancel_only_affects_current_turn() {
        let store = InMemoryConversationStore::new();
        let id = store
            .create(ConversationState::new(ConversationSettings::default()))
            .unwrap();

        let first = store.begin_turn(&id).unwrap();
        store.cancel_turn(&id).unwrap();
        assert!(first.is_cancelled());

        let second = store.begin_turn(&id).unwrap();
        assert!(!second.is_cancelled());
    }

    #[test]
    fn test_remove_cancels_in_flight_turn() {
        let store = InMemoryConversationStore::new();
        let id = store
            .create(ConversationState::new(ConversationSettings::default()))
            .unwrap();
        let token = store.begin_turn(&id).unwrap();

        store.remove(&id).unwrap();
        assert!(token.is_cancelled());
        assert!(matches!(
            store.begin_turn(&id),
            Err(ConversationError::NotFound(_))
        ));
    }
}
