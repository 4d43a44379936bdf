//! Turn Handlers
//!
//! 文本轮次、语音轮次与取消

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::sync::Arc;

use crate::application::{CancelTurnCommand, TextTurnCommand, VoiceTurnCommand};
use crate::infrastructure::http::dto::{
    ApiResponse, ConversationIdRequest, Empty, TextTurnRequest, TurnResponseDto,
    VoiceTurnResponseDto,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 文本轮次
pub async fn text_turn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextTurnRequest>,
) -> Result<Json<ApiResponse<TurnResponseDto>>, ApiError> {
    let conversation_id = req.conversation_id.clone();
    let cmd = TextTurnCommand {
        conversation_id: req.conversation_id,
        text: req.text,
    };

    let outcome = state.text_turn_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(TurnResponseDto::new(
        conversation_id,
        outcome,
    ))))
}

/// 语音轮次
///
/// multipart 字段：`conversation_id` 与 `file`（WAV 录音）
pub async fn voice_turn(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<VoiceTurnResponseDto>>, ApiError> {
    let mut conversation_id: Option<String> = None;
    let mut audio: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "conversation_id" => {
                conversation_id = Some(field.text().await.map_err(|e| {
                    ApiError::BadRequest(format!("Failed to read conversation_id: {}", e))
                })?);
            }
            "file" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

                if data.len() > state.max_upload_size {
                    return Err(ApiError::BadRequest(format!(
                        "Recording too large: {} bytes (max {})",
                        data.len(),
                        state.max_upload_size
                    )));
                }

                audio = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let conversation_id = conversation_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("conversation_id is required".to_string()))?;
    let audio = audio.ok_or_else(|| ApiError::BadRequest("Audio file is required".to_string()))?;

    tracing::debug!(
        conversation_id = %conversation_id,
        size = audio.len(),
        "Voice turn received"
    );

    let cmd = VoiceTurnCommand {
        conversation_id: conversation_id.clone(),
        audio,
    };

    let outcome = state.voice_turn_handler.handle(cmd).await?;

    Ok(Json(ApiResponse::success(VoiceTurnResponseDto::new(
        conversation_id,
        outcome,
    ))))
}

/// 取消进行中的合成
pub async fn cancel_turn(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConversationIdRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let cmd = CancelTurnCommand {
        conversation_id: req.conversation_id,
    };

    state.cancel_turn_handler.handle(cmd)?;

    Ok(Json(ApiResponse::ok()))
}
