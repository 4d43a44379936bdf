//! Conversation Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{
    ClearConversationCommand, CloseConversationCommand, CreateConversationCommand,
    GetConversationQuery, ListConversationsQuery, UpdateSettingsCommand,
};
use crate::infrastructure::http::dto::{
    ApiResponse, ConversationDto, ConversationIdRequest, ConversationSettingsDto,
    CreateConversationRequest, Empty, UpdateSettingsRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 创建对话
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    req: Option<Json<CreateConversationRequest>>,
) -> Result<Json<ApiResponse<ConversationSettingsDto>>, ApiError> {
    // 请求体可省略
    let req = req.map(|Json(r)| r).unwrap_or_default();
    let cmd = CreateConversationCommand {
        speech_language: req.speech_language,
        auto_play: req.auto_play,
    };

    let result = state.create_conversation_handler.handle(cmd)?;

    Ok(Json(ApiResponse::success(ConversationSettingsDto::new(
        result.conversation_id,
        result.settings,
    ))))
}

/// 获取对话详情
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConversationIdRequest>,
) -> Result<Json<ApiResponse<ConversationDto>>, ApiError> {
    let query = GetConversationQuery {
        conversation_id: req.conversation_id,
    };

    let view = state.get_conversation_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(view.into())))
}

/// 列出所有对话 ID
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<Vec<String>>> {
    let ids = state
        .list_conversations_handler
        .handle(ListConversationsQuery);
    Json(ApiResponse::success(ids))
}

/// 修改识别语言或自动播放
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<ConversationSettingsDto>>, ApiError> {
    let cmd = UpdateSettingsCommand {
        conversation_id: req.conversation_id,
        speech_language: req.speech_language,
        auto_play: req.auto_play,
        toggle_auto_play: req.toggle_auto_play,
    };

    let result = state.update_settings_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(ConversationSettingsDto::new(
        result.conversation_id,
        result.settings,
    ))))
}

/// 清空历史
pub async fn clear_conversation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConversationIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let cmd = ClearConversationCommand {
        conversation_id: req.conversation_id,
    };

    state.clear_conversation_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::ok()))
}

/// 关闭对话，进行中的合成随之取消
pub async fn close_conversation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConversationIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let cmd = CloseConversationCommand {
        conversation_id: req.conversation_id,
    };

    state.close_conversation_handler.handle(cmd)?;

    Ok(Json(ApiResponse::ok()))
}
