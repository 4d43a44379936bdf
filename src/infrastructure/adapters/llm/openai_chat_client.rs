//! OpenAI Chat Client - 对话补全
//!
//! POST {base_url}/v1/chat/completions
//! Request: {"model", "messages", "temperature", "max_tokens"}
//! Response: {"choices": [{"message": {"content": "..."}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ChatCompletionPort, ChatError};
use crate::domain::conversation::ChatMessage;

/// Chat 客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiChatConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for OpenAiChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 250,
            timeout_secs: 60,
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI 对话补全客户端
pub struct OpenAiChatClient {
    client: Client,
    endpoint: String,
    config: OpenAiChatConfig,
}

impl OpenAiChatClient {
    pub fn new(config: OpenAiChatConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/v1/chat/completions",
                config.base_url.trim_end_matches('/')
            ),
            config,
        })
    }
}

#[async_trait]
impl ChatCompletionPort for OpenAiChatClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatError> {
        let body = CompletionRequest {
            model: &self.config.model,
            messages: &messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "Requesting chat completion"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %error_text, "Chat API error");
            return Err(ChatError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let result: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ChatError::InvalidResponse("No choices in response".to_string()))
    }
}
