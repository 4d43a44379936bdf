//! WebSocket Handler
//!
//! 每个对话一条连接，推送合成进度与结果

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::infrastructure::events::WsEvent;
use crate::infrastructure::http::state::AppState;

/// 对话 WebSocket 连接处理
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(conversation_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_conversation_socket(socket, conversation_id, state))
}

async fn handle_conversation_socket(
    socket: WebSocket,
    conversation_id: String,
    state: Arc<AppState>,
) {
    let (mut sender, mut receiver) = socket.split();

    // 验证对话存在
    if !state.conversation_store.exists(&conversation_id) {
        tracing::warn!(
            conversation_id = %conversation_id,
            "WebSocket connection rejected: unknown conversation"
        );
        let _ = sender.close().await;
        return;
    }

    // 注册事件接收器
    let mut event_rx = state.event_publisher.register_conversation(&conversation_id);

    tracing::info!(conversation_id = %conversation_id, "WebSocket connected");

    let id_for_forward = conversation_id.clone();
    let id_for_receive = conversation_id.clone();

    // 事件转发任务
    let mut forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        conversation_id = %id_for_forward,
                        skipped,
                        "WebSocket lagged behind events"
                    );
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let closing = matches!(event, WsEvent::ConversationClosed { .. });
            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(
                    conversation_id = %id_for_forward,
                    error = %e,
                    "Failed to send WebSocket message"
                );
                break;
            }

            if closing {
                let _ = sender.close().await;
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let mut receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!(conversation_id = %id_for_receive, "WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(conversation_id = %id_for_receive, error = %e, "WebSocket error");
                    break;
                }
                // Ping 由 axum 自动响应 pong
                _ => {}
            }
        }
    });

    // 任一任务结束后停止另一个，确保接收器已释放
    tokio::select! {
        _ = &mut forward_task => {
            receive_task.abort();
            let _ = receive_task.await;
        }
        _ = &mut receive_task => {
            forward_task.abort();
            let _ = forward_task.await;
        }
    }

    // 清理
    state.event_publisher.release_conversation(&conversation_id);
    tracing::info!(conversation_id = %conversation_id, "WebSocket disconnected");
}
