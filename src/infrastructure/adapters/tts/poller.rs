//! Synthesis Job Poller - 轮询合成任务并下载音频
//!
//! 外部 API:
//! GET <speak_url>           (Bearer 认证) -> {"status" | "result.status", "result.audio_download_url" | "audio_download_url"}
//! GET <audio_download_url>  (无认证)      -> audio/wav binary

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::extract::classify_poll_body;
use super::policy::PollPolicy;
use crate::application::ports::{PollError, PollProgress, ProgressReporter};
use crate::domain::synthesis::{JobHandle, PollResult};

/// 合成任务轮询器
///
/// 从不重新提交任务。失败或超时后由调用方决定是否重新开始
pub struct SynthesisJobPoller {
    client: Client,
    api_key: String,
    policy: PollPolicy,
}

impl SynthesisJobPoller {
    pub fn new(client: Client, api_key: impl Into<String>, policy: PollPolicy) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            policy,
        }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// 轮询直到任务完成或次数用尽，完成后下载音频
    pub async fn poll_until_complete(
        &self,
        handle: &JobHandle,
        progress: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, PollError> {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        while attempt < max_attempts {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                result = self.poll_once(handle) => result?,
            };
            attempt += 1;
            let malformed = result == PollResult::Malformed;

            match result {
                PollResult::Done {
                    audio_url: Some(audio_url),
                } => {
                    tracing::debug!(attempt = attempt, "Synthesis job done");
                    let audio = tokio::select! {
                        _ = cancel.cancelled() => return Err(PollError::Cancelled),
                        audio = self.download(&audio_url) => audio?,
                    };
                    progress.report(PollProgress::finished(attempt, max_attempts));
                    return Ok(audio);
                }
                PollResult::Done { audio_url: None } => {
                    tracing::warn!(attempt = attempt, "Job done without audio_download_url");
                    return Err(PollError::AudioUrlMissing);
                }
                PollResult::Pending | PollResult::Malformed => {
                    if malformed {
                        tracing::debug!(attempt = attempt, "Unparseable poll response, retrying");
                    }
                    progress.report(PollProgress::after_attempt(attempt, max_attempts));

                    if attempt < max_attempts {
                        let delay = self.policy.delay_after(attempt);
                        tokio::select! {
                            _ = cancel.cancelled() => return Err(PollError::Cancelled),
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                }
            }
        }

        progress.report(PollProgress::finished(attempt, max_attempts));
        tracing::warn!(max_attempts = max_attempts, "Exceeded maximum polling attempts");
        Err(PollError::Timeout(max_attempts))
    }

    /// 单次状态查询
    async fn poll_once(&self, handle: &JobHandle) -> Result<PollResult, PollError> {
        let response = self
            .client
            .get(handle.as_str())
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| PollError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PollError::Transport {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let body = response.bytes().await.map_err(|e| PollError::Transport {
            status: Some(status.as_u16()),
            message: format!("Failed to read poll response: {}", e),
        })?;

        Ok(classify_poll_body(&body))
    }

    /// 下载音频，下载地址是预签名 URL，不带认证头
    async fn download(&self, audio_url: &str) -> Result<Vec<u8>, PollError> {
        let response = self
            .client
            .get(audio_url)
            .send()
            .await
            .map_err(|e| PollError::DownloadFailed {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PollError::DownloadFailed {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| PollError::DownloadFailed {
                status: Some(status.as_u16()),
                message: format!("Failed to read audio: {}", e),
            })?
            .to_vec();

        tracing::debug!(audio_size = audio.len(), "Audio downloaded");
        Ok(audio)
    }
}
