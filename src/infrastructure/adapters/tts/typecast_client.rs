//! Typecast TTS Client - 调用 Typecast 异步合成服务
//!
//! 实现 SpeechSynthesizerPort trait:
//! 1. POST /api/speak 提交任务，得到状态轮询 URL
//! 2. 轮询直到 status == "done"
//! 3. 下载音频并写入 AudioStoragePort

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::policy::PollPolicy;
use super::poller::SynthesisJobPoller;
use super::submitter::SynthesisJobSubmitter;
use crate::application::ports::{
    AudioStoragePort, SpeechSynthesizerPort, SynthesisContext, SynthesisError,
};
use crate::domain::synthesis::{SynthesisRequest, SynthesizedAudioArtifact};

/// Typecast 客户端配置
#[derive(Debug, Clone)]
pub struct TypecastClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// 单次 HTTP 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 轮询策略
    pub poll_policy: PollPolicy,
}

impl Default for TypecastClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://typecast.ai".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            poll_policy: PollPolicy::default(),
        }
    }
}

impl TypecastClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }
}

/// Typecast 合成客户端
pub struct TypecastTtsClient {
    submitter: SynthesisJobSubmitter,
    poller: SynthesisJobPoller,
    storage: Arc<dyn AudioStoragePort>,
}

impl TypecastTtsClient {
    /// 创建新的客户端，提交器和轮询器共享同一个连接池
    pub fn new(
        config: TypecastClientConfig,
        storage: Arc<dyn AudioStoragePort>,
    ) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Configuration(e.to_string()))?;

        Ok(Self {
            submitter: SynthesisJobSubmitter::new(
                client.clone(),
                &config.base_url,
                config.api_key.clone(),
            ),
            poller: SynthesisJobPoller::new(client, config.api_key, config.poll_policy),
            storage,
        })
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        self.poller.policy()
    }
}

#[async_trait]
impl SpeechSynthesizerPort for TypecastTtsClient {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
        ctx: &SynthesisContext,
    ) -> Result<SynthesizedAudioArtifact, SynthesisError> {
        let handle = self.submitter.submit(&request).await?;

        let audio = self
            .poller
            .poll_until_complete(&handle, ctx.progress.as_ref(), &ctx.cancel)
            .await?;

        let path = self
            .storage
            .save_audio(&audio)
            .await
            .map_err(|e| SynthesisError::Storage(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            audio_size = audio.len(),
            text_len = request.text().len(),
            "Speech synthesis completed"
        );

        Ok(SynthesizedAudioArtifact::new(
            path,
            request.text(),
            audio.len() as u64,
        ))
    }
}
