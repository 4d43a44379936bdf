//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                      GET   健康检查
//! - /api/conversation/create       POST  创建对话
//! - /api/conversation/get          POST  获取历史、设置与最近音频
//! - /api/conversation/list         GET   列出所有对话
//! - /api/conversation/settings     POST  修改识别语言 / 自动播放
//! - /api/conversation/clear        POST  清空历史
//! - /api/conversation/close        POST  关闭对话
//! - /api/turn/text                 POST  文本轮次
//! - /api/turn/voice                POST  语音轮次（multipart）
//! - /api/turn/cancel               POST  取消进行中的合成
//! - /api/audio/{file_name}         GET   下载合成音频
//! - /api/audio/delete              POST  删除合成音频
//! - /ws/conversation/{id}          WS    对话 WebSocket（合成事件）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route(
            "/ws/conversation/:conversation_id",
            get(handlers::websocket_handler),
        )
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/conversation", conversation_routes())
        .nest("/turn", turn_routes())
        .nest("/audio", audio_routes())
}

/// Conversation 路由
fn conversation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_conversation))
        .route("/get", post(handlers::get_conversation))
        .route("/list", get(handlers::list_conversations))
        .route("/settings", post(handlers::update_settings))
        .route("/clear", post(handlers::clear_conversation))
        .route("/close", post(handlers::close_conversation))
}

/// Turn 路由
fn turn_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/text", post(handlers::text_turn))
        .route("/voice", post(handlers::voice_turn))
        .route("/cancel", post(handlers::cancel_turn))
}

/// Audio 路由
fn audio_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/delete", post(handlers::delete_audio))
        .route("/:file_name", get(handlers::get_audio))
}
