//! Conversation Queries

/// 获取对话详情
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: String,
}

/// 列出所有对话
#[derive(Debug, Clone)]
pub struct ListConversationsQuery;
