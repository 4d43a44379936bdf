//! Audio Handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::application::{DeleteAudioCommand, GetAudioQuery};
use crate::infrastructure::http::dto::{ApiResponse, DeleteAudioRequest, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 流式返回合成音频
pub async fn get_audio(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
) -> Result<Response, ApiError> {
    let result = state
        .get_audio_handler
        .handle(GetAudioQuery {
            file_name: file_name.clone(),
        })
        .await?;

    let file = tokio::fs::File::open(&result.path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open audio file: {}", e)))?;

    let body = Body::from_stream(ReaderStream::new(file));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(header::CONTENT_LENGTH, result.size_bytes)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file_name),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}

/// 删除合成音频
pub async fn delete_audio(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteAudioRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_audio_handler
        .handle(DeleteAudioCommand {
            file_name: req.file_name,
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}
