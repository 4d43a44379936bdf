//! Fake TTS Client - 离线合成器
//!
//! 不调用外部服务。返回配置的固定音频文件，未配置时生成一段静音 WAV。
//! 用于本地开发和测试，仍然走 AudioStoragePort 落盘

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    AudioStoragePort, PollError, PollProgress, SpeechSynthesizerPort, SynthesisContext,
    SynthesisError,
};
use crate::domain::synthesis::{SynthesisRequest, SynthesizedAudioArtifact};

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 固定返回的音频文件路径，为空时生成静音
    pub audio_file_path: Option<PathBuf>,
    /// 静音时长（毫秒）
    pub duration_ms: u64,
    /// 采样率
    pub sample_rate: u32,
    /// 模拟合成延迟（毫秒）
    pub delay_ms: u64,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            audio_file_path: None,
            duration_ms: 500,
            sample_rate: 22050,
            delay_ms: 200,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    /// 缓存的音频数据
    audio_data: Vec<u8>,
    storage: Arc<dyn AudioStoragePort>,
}

impl FakeTtsClient {
    pub fn new(
        config: FakeTtsClientConfig,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Result<Self, SynthesisError> {
        let audio_data = match &config.audio_file_path {
            Some(path) => std::fs::read(path).map_err(|e| {
                SynthesisError::Configuration(format!("{}: {}", path.display(), e))
            })?,
            None => silent_wav(config.sample_rate, config.duration_ms),
        };

        tracing::info!(
            audio_size = audio_data.len(),
            delay_ms = config.delay_ms,
            "FakeTtsClient initialized"
        );

        Ok(Self {
            config,
            audio_data,
            storage,
        })
    }
}

/// 16-bit 单声道 PCM 静音
fn silent_wav(sample_rate: u32, duration_ms: u64) -> Vec<u8> {
    let samples = (sample_rate as u64 * duration_ms / 1000) as u32;
    let data_size = samples * 2;
    let byte_rate = sample_rate * 2;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    wav.resize(44 + data_size as usize, 0);
    wav
}

#[async_trait]
impl SpeechSynthesizerPort for FakeTtsClient {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
        ctx: &SynthesisContext,
    ) -> Result<SynthesizedAudioArtifact, SynthesisError> {
        tracing::debug!(
            text_len = request.text().len(),
            actor_id = %request.voice_actor_id(),
            "FakeTtsClient: returning fixed audio"
        );

        // 模拟合成延迟
        tokio::select! {
            _ = ctx.cancel.cancelled() => {
                return Err(PollError::Cancelled.into());
            }
            _ = tokio::time::sleep(Duration::from_millis(self.config.delay_ms)) => {}
        }

        let path = self
            .storage
            .save_audio(&self.audio_data)
            .await
            .map_err(|e| SynthesisError::Storage(e.to_string()))?;
        ctx.progress.report(PollProgress::finished(1, 1));

        Ok(SynthesizedAudioArtifact::new(
            path,
            request.text(),
            self.audio_data.len() as u64,
        ))
    }
}
