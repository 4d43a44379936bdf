//! Audio Command Handlers

use std::sync::Arc;

use crate::application::commands::audio_commands::DeleteAudioCommand;
use crate::application::error::ApplicationError;
use crate::application::ports::AudioStoragePort;

/// DeleteAudio Handler - 删除合成音频
///
/// 目录里的文件由调用方决定保留或删除，系统不做自动清理
pub struct DeleteAudioHandler {
    storage: Arc<dyn AudioStoragePort>,
}

impl DeleteAudioHandler {
    pub fn new(storage: Arc<dyn AudioStoragePort>) -> Self {
        Self { storage }
    }

    pub async fn handle(&self, cmd: DeleteAudioCommand) -> Result<(), ApplicationError> {
        self.storage.delete_audio(&cmd.file_name).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::Fixture;

    #[tokio::test]
    async fn test_delete_audio() {
        let fixture = Fixture::new(Ok("r"), Ok("t"), true).await;
        let path = fixture.storage.save_audio(b"RIFFWAVE").await.unwrap();
        let file_name = path.file_name().unwrap().to_str().unwrap().to_string();
        let handler = DeleteAudioHandler::new(fixture.storage.clone());

        handler
            .handle(DeleteAudioCommand {
                file_name: file_name.clone(),
            })
            .await
            .unwrap();
        assert!(!path.exists());

        let err = handler
            .handle(DeleteAudioCommand { file_name })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let fixture = Fixture::new(Ok("r"), Ok("t"), true).await;
        let err = DeleteAudioHandler::new(fixture.storage.clone())
            .handle(DeleteAudioCommand {
                file_name: "../config.toml".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
