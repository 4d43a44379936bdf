//! File Storage - 文件系统音频存储实现
//!
//! 实现 AudioStoragePort trait
//!
//! 文件命名: speech_{UTC 时间戳到微秒}_{8 位随机十六进制}.wav

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::{AudioStorageError, AudioStoragePort};

const FILE_PREFIX: &str = "speech_";
const FILE_EXTENSION: &str = ".wav";

/// 文件系统音频存储
pub struct FileAudioStorage {
    /// 存储根目录
    base_dir: PathBuf,
}

impl FileAudioStorage {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, AudioStorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 生成新文件名
    fn next_file_name() -> String {
        let timestamp = Utc::now().format("%Y%m%d%H%M%S%6f");
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}{}_{}{}", FILE_PREFIX, timestamp, &suffix[..8], FILE_EXTENSION)
    }

    /// 只接受本存储生成的文件名，拒绝路径分隔符和 `..`
    fn validate_file_name(file_name: &str) -> Result<(), AudioStorageError> {
        let valid = file_name.starts_with(FILE_PREFIX)
            && file_name.ends_with(FILE_EXTENSION)
            && file_name.len() > FILE_PREFIX.len() + FILE_EXTENSION.len()
            && file_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            && !file_name.contains("..");

        if valid {
            Ok(())
        } else {
            Err(AudioStorageError::InvalidFileName(file_name.to_string()))
        }
    }
}

#[async_trait]
impl AudioStoragePort for FileAudioStorage {
    fn audio_path(&self, file_name: &str) -> Result<PathBuf, AudioStorageError> {
        Self::validate_file_name(file_name)?;
        Ok(self.base_dir.join(file_name))
    }

    async fn save_audio(&self, data: &[u8]) -> Result<PathBuf, AudioStorageError> {
        let audio_path = self.base_dir.join(Self::next_file_name());

        fs::write(&audio_path, data)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::debug!(
            path = %audio_path.display(),
            size = data.len(),
            "Saved synthesized audio"
        );

        Ok(audio_path)
    }

    async fn read_audio(&self, file_name: &str) -> Result<Vec<u8>, AudioStorageError> {
        let audio_path = self.audio_path(file_name)?;

        if !audio_path.exists() {
            return Err(AudioStorageError::FileNotFound(file_name.to_string()));
        }

        fs::read(&audio_path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))
    }

    async fn delete_audio(&self, file_name: &str) -> Result<(), AudioStorageError> {
        let audio_path = self.audio_path(file_name)?;

        if !audio_path.exists() {
            return Err(AudioStorageError::FileNotFound(file_name.to_string()));
        }

        fs::remove_file(&audio_path)
            .await
            .map_err(|e| AudioStorageError::IoError(e.to_string()))?;

        tracing::info!(file_name = %file_name, "Deleted synthesized audio");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_save_read_delete() {
        let temp_dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(temp_dir.path()).await.unwrap();

        let path = storage.save_audio(b"fake wav").await.unwrap();
        assert!(path.exists());
        assert_eq!(path.parent().unwrap(), temp_dir.path());

        let file_name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert_eq!(storage.read_audio(&file_name).await.unwrap(), b"fake wav");

        storage.delete_audio(&file_name).await.unwrap();
        assert!(!path.exists());
        assert!(matches!(
            storage.read_audio(&file_name).await,
            Err(AudioStorageError::FileNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rapid_saves_get_unique_names() {
        let temp_dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(temp_dir.path()).await.unwrap();

        let mut names = HashSet::new();
        for _ in 0..50 {
            let path = storage.save_audio(b"x").await.unwrap();
            assert!(names.insert(path));
        }
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 50);
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a/b/audio_files");
        let storage = FileAudioStorage::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(storage.base_dir(), nested.as_path());
    }

    #[test]
    fn test_file_name_format() {
        let name = FileAudioStorage::next_file_name();
        assert!(name.starts_with("speech_"));
        assert!(name.ends_with(".wav"));
        assert!(FileAudioStorage::validate_file_name(&name).is_ok());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let temp_dir = tempdir().unwrap();
        let storage = FileAudioStorage::new(temp_dir.path()).await.unwrap();

        for name in [
            "../secret.wav",
            "speech_../../etc.wav",
            "speech_/x.wav",
            "other.wav",
            "speech_.wav",
            "speech_1.mp3",
        ] {
            assert!(
                matches!(
                    storage.audio_path(name),
                    Err(AudioStorageError::InvalidFileName(_))
                ),
                "accepted {}",
                name
            );
        }
    }
}
