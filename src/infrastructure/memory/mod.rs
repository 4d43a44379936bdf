//! Memory Layer - In-Memory State Management
//!
//! 管理对话状态和每轮的取消令牌

mod conversation_store;

pub use conversation_store::InMemoryConversationStore;
