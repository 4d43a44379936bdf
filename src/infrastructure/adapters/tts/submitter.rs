//! Synthesis Job Submitter - 提交合成任务
//!
//! 外部 API:
//! POST {base_url}/api/speak  (Bearer 认证)
//! Request: {"text", "lang", "actor_id", "xapi_hd", "model_version", "tempo", "volume", "pitch"}
//! Response: {"result": {"speak_v2_url" | "speak_url": "..."}}

use reqwest::Client;
use serde::Serialize;

use super::extract::extract_handle;
use crate::application::ports::SubmitError;
use crate::domain::synthesis::{JobHandle, SynthesisRequest};

/// 固定使用最新模型
const MODEL_VERSION: &str = "latest";

/// 提交请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeakRequestBody<'a> {
    text: &'a str,
    lang: &'a str,
    actor_id: &'a str,
    xapi_hd: bool,
    model_version: &'a str,
    tempo: f32,
    volume: u8,
    pitch: i32,
}

impl<'a> From<&'a SynthesisRequest> for SpeakRequestBody<'a> {
    fn from(request: &'a SynthesisRequest) -> Self {
        Self {
            text: request.text(),
            lang: request.language_hint().as_str(),
            actor_id: request.voice_actor_id(),
            xapi_hd: request.audio_quality_hd(),
            model_version: MODEL_VERSION,
            tempo: request.speed(),
            volume: request.volume(),
            pitch: request.pitch(),
        }
    }
}

/// 合成任务提交器
///
/// 不做重试，不写磁盘
pub struct SynthesisJobSubmitter {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl SynthesisJobSubmitter {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: format!("{}/api/speak", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 提交合成请求，返回状态轮询句柄
    pub async fn submit(&self, request: &SynthesisRequest) -> Result<JobHandle, SubmitError> {
        let body = SpeakRequestBody::from(request);

        tracing::debug!(
            url = %self.endpoint,
            text_len = body.text.len(),
            actor_id = %body.actor_id,
            lang = %body.lang,
            "Submitting synthesis job"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SubmitError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SubmitError::Transport {
                status: Some(status.as_u16()),
                message: error_text,
            });
        }

        let raw = response.bytes().await.map_err(|e| SubmitError::Transport {
            status: Some(status.as_u16()),
            message: format!("Failed to read response: {}", e),
        })?;

        let value: serde_json::Value = match serde_json::from_slice(&raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Synthesis response is not JSON");
                return Err(SubmitError::HandleMissing);
            }
        };

        let handle = extract_handle(&value).ok_or(SubmitError::HandleMissing)?;
        tracing::info!(handle = %handle, "Synthesis job submitted");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::{LanguageHint, VoiceSettings};
    use crate::infrastructure::adapters::tts::test_support::{MockScript, MockTypecast, SubmitShape};

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest::new(text, &VoiceSettings::default()).unwrap()
    }

    fn submitter(mock: &MockTypecast) -> SynthesisJobSubmitter {
        SynthesisJobSubmitter::new(Client::new(), &mock.base_url, "test-key")
    }

    fn script(submit: SubmitShape) -> MockScript {
        MockScript {
            submit,
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let submitter = SynthesisJobSubmitter::new(Client::new(), "https://typecast.ai/", "k");
        assert_eq!(submitter.endpoint(), "https://typecast.ai/api/speak");
    }

    #[tokio::test]
    async fn test_submit_sends_provider_fields() {
        let mock = MockTypecast::start(script(SubmitShape::V2)).await;
        let voice = VoiceSettings {
            actor_id: "actor-42".to_string(),
            language: LanguageHint::Ko,
            hd: true,
            speed: 1.1,
            volume: 90,
            pitch: 2,
        };
        let request = SynthesisRequest::new("안녕하세요", &voice).unwrap();

        submitter(&mock).submit(&request).await.unwrap();

        let bodies = mock.submit_bodies();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert_eq!(body["text"], "안녕하세요");
        assert_eq!(body["lang"], "ko");
        assert_eq!(body["actor_id"], "actor-42");
        assert_eq!(body["xapi_hd"], true);
        assert_eq!(body["model_version"], "latest");
        assert_eq!(body["volume"], 90);
        assert_eq!(body["pitch"], 2);
        assert!((body["tempo"].as_f64().unwrap() - 1.1).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_submit_prefers_v2_url() {
        let mock = MockTypecast::start(script(SubmitShape::V2)).await;
        let handle = submitter(&mock).submit(&request("hi")).await.unwrap();
        assert_eq!(
            handle.as_str(),
            format!("{}/api/speak/v2/job-1", mock.base_url)
        );
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_speak_url() {
        let mock = MockTypecast::start(script(SubmitShape::V1)).await;
        let handle = submitter(&mock).submit(&request("hi")).await.unwrap();
        assert!(handle.as_str().ends_with("/api/speak/v2/job-1"));
    }

    #[tokio::test]
    async fn test_submit_handle_missing() {
        let mock = MockTypecast::start(script(SubmitShape::Missing)).await;
        let err = submitter(&mock).submit(&request("hi")).await.unwrap_err();
        assert!(matches!(err, SubmitError::HandleMissing));
    }

    #[tokio::test]
    async fn test_submit_non_json_is_handle_missing() {
        let mock = MockTypecast::start(script(SubmitShape::NotJson)).await;
        let err = submitter(&mock).submit(&request("hi")).await.unwrap_err();
        assert!(matches!(err, SubmitError::HandleMissing));
    }

    #[tokio::test]
    async fn test_submit_http_error_is_transport() {
        let mock = MockTypecast::start(script(SubmitShape::Status(401))).await;
        let err = submitter(&mock).submit(&request("hi")).await.unwrap_err();
        match err {
            SubmitError::Transport { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "rejected");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_connection_refused_is_transport() {
        // 绑定后立即释放端口，保证没有服务监听
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let submitter =
            SynthesisJobSubmitter::new(Client::new(), &format!("http://{}", addr), "k");
        let err = submitter.submit(&request("hi")).await.unwrap_err();
        assert!(matches!(err, SubmitError::Transport { status: None, .. }));
    }

    #[tokio::test]
    async fn test_identical_requests_get_independent_handles() {
        let mock = MockTypecast::start(script(SubmitShape::V2)).await;
        let submitter = submitter(&mock);
        let request = request("same text");

        let first = submitter.submit(&request).await.unwrap();
        let second = submitter.submit(&request).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(mock.submits(), 2);
    }
}
