//! Audio Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::AudioStoragePort;
use crate::application::queries::audio_queries::{GetAudioQuery, GetAudioResponse};

/// GetAudio Handler - 定位合成音频
pub struct GetAudioHandler {
    storage: Arc<dyn AudioStoragePort>,
}

impl GetAudioHandler {
    pub fn new(storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, query: GetAudioQuery) -> Result<GetAudioResponse, ApplicationError> {
        let path = self.storage.audio_path(&query.file_name)?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| ApplicationError::not_found("Audio", &query.file_name))?;

        Ok(GetAudioResponse {
            path,
            size_bytes: metadata.len(),
            content_type: "audio/wav".to_string(),
        })
    }
}
