//! Whisper Client - OpenAI 语音识别
//!
//! POST {base_url}/v1/audio/transcriptions (multipart)
//! 字段: file (audio.wav), model, language (可选)
//! Response: {"text": "..."}

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{SpeechToTextPort, SttError};
use crate::domain::synthesis::LanguageHint;

/// Whisper 客户端配置
#[derive(Debug, Clone)]
pub struct WhisperClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for WhisperClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "whisper-1".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper 语音识别客户端
pub struct WhisperClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl WhisperClient {
    pub fn new(config: WhisperClientConfig) -> Result<Self, SttError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SttError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1/audio/transcriptions",
                config.base_url.trim_end_matches('/')
            ),
            api_key: config.api_key,
            model: config.model,
        })
    }
}

#[async_trait]
impl SpeechToTextPort for WhisperClient {
    async fn transcribe(&self, audio: Vec<u8>, language: LanguageHint) -> Result<String, SttError> {
        tracing::debug!(
            audio_bytes = audio.len(),
            language = %language,
            "Starting transcription"
        );

        let file = multipart::Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| SttError::InvalidResponse(e.to_string()))?;

        let mut form = multipart::Form::new()
            .part("file", file)
            .text("model", self.model.clone());
        if let Some(code) = language.language_code() {
            form = form.text("language", code.to_string());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SttError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Transcription API error");
            return Err(SttError::ServiceError(format!("HTTP {}: {}", status, body)));
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SttError::InvalidResponse(e.to_string()))?;

        tracing::info!(transcript_len = result.text.len(), "Transcription complete");
        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Multipart, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Fields = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

    async fn start_mock(status: StatusCode) -> (String, Fields) {
        let fields: Fields = Arc::new(Mutex::new(Vec::new()));
        let recorded = fields.clone();

        let app = Router::new().route(
            "/v1/audio/transcriptions",
            post(move |mut multipart: Multipart| {
                let recorded = recorded.clone();
                async move {
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        let data = field.bytes().await.unwrap().to_vec();
                        recorded.lock().unwrap().push((name, data));
                    }
                    let body: Value = json!({ "text": "안녕하세요" });
                    (status, Json(body))
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (base_url, fields)
    }

    fn client(base_url: &str) -> WhisperClient {
        WhisperClient::new(WhisperClientConfig {
            base_url: base_url.to_string(),
            api_key: "k".to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    fn field_names(fields: &Fields) -> Vec<String> {
        fields.lock().unwrap().iter().map(|(n, _)| n.clone()).collect()
    }

    #[tokio::test]
    async fn test_transcribe_with_language() {
        let (base_url, fields) = start_mock(StatusCode::OK).await;
        let text = client(&base_url)
            .transcribe(b"RIFF".to_vec(), LanguageHint::Ko)
            .await
            .unwrap();

        assert_eq!(text, "안녕하세요");
        let recorded = fields.lock().unwrap().clone();
        assert!(recorded.contains(&("file".to_string(), b"RIFF".to_vec())));
        assert!(recorded.contains(&("model".to_string(), b"whisper-1".to_vec())));
        assert!(recorded.contains(&("language".to_string(), b"ko".to_vec())));
    }

    #[tokio::test]
    async fn test_auto_language_omits_field() {
        let (base_url, fields) = start_mock(StatusCode::OK).await;
        client(&base_url)
            .transcribe(b"RIFF".to_vec(), LanguageHint::Auto)
            .await
            .unwrap();

        assert!(!field_names(&fields).contains(&"language".to_string()));
    }

    #[tokio::test]
    async fn test_service_error() {
        let (base_url, _) = start_mock(StatusCode::BAD_REQUEST).await;
        let err = client(&base_url)
            .transcribe(b"RIFF".to_vec(), LanguageHint::En)
            .await
            .unwrap_err();
        assert!(matches!(err, SttError::ServiceError(_)));
    }
}
