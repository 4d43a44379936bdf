//! Turn Pipeline - 单轮对话编排
//!
//! 用户输入 -> 语言模型回复 -> 语音合成。对话状态由调用方显式传入
//!
//! 失败语义:
//! - 识别失败: 不执行本轮，transcript 为 None
//! - 回复失败: 回复替换为道歉文本，本轮不写入历史，仍尝试合成
//! - 合成失败: 文本回复照常返回，附带 "Voice synthesis failed" 提示

use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    ChatCompletionPort, SpeechSynthesizerPort, SpeechToTextPort, SynthesisContext,
};
use crate::domain::conversation::{ConversationState, ConversationTurn};
use crate::domain::synthesis::{SynthesisRequest, SynthesizedAudioArtifact, VoiceSettings};
use crate::infrastructure::events::{ConversationProgressReporter, EventPublisher};

/// 合成失败时展示给用户的提示
pub const SYNTHESIS_FAILED_NOTICE: &str = "Voice synthesis failed";

/// 单轮处理结果
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub user_text: String,
    pub reply: String,
    pub via_speech: bool,
    /// 回复是否为生成失败后的道歉文本
    pub chat_failed: bool,
    pub audio: Option<SynthesizedAudioArtifact>,
    pub synthesis_error: Option<String>,
}

impl TurnOutcome {
    pub fn notice(&self) -> Option<&'static str> {
        self.audio.is_none().then_some(SYNTHESIS_FAILED_NOTICE)
    }
}

/// 语音输入的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct VoiceTurnOutcome {
    pub transcript: Option<String>,
    pub transcription_error: Option<String>,
    pub turn: Option<TurnOutcome>,
}

/// 单轮对话编排器
pub struct TurnPipeline {
    chat: Arc<dyn ChatCompletionPort>,
    stt: Arc<dyn SpeechToTextPort>,
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    event_publisher: Arc<EventPublisher>,
    voice: VoiceSettings,
    system_prompt: String,
}

impl TurnPipeline {
    pub fn new(
        chat: Arc<dyn ChatCompletionPort>,
        stt: Arc<dyn SpeechToTextPort>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        event_publisher: Arc<EventPublisher>,
        voice: VoiceSettings,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            chat,
            stt,
            synthesizer,
            event_publisher,
            voice,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    /// 处理文本输入，空白输入返回 None
    pub async fn process_text(
        &self,
        state: &mut ConversationState,
        user_text: &str,
        via_speech: bool,
        cancel: CancellationToken,
    ) -> Option<TurnOutcome> {
        if user_text.trim().is_empty() {
            return None;
        }

        let messages = state.chat_messages(&self.system_prompt, user_text);
        let (reply, chat_failed) = match self.chat.complete(messages).await {
            Ok(reply) => {
                let mut turn = ConversationTurn::new(user_text, &reply);
                if via_speech {
                    turn = turn.spoken();
                }
                state.record_turn(turn);
                (reply, false)
            }
            Err(e) => {
                tracing::error!(
                    conversation_id = %state.id(),
                    error = %e,
                    "Chat completion failed"
                );
                (format!("Sorry, I couldn't generate a response: {}", e), true)
            }
        };

        let (audio, synthesis_error) = match self.synthesize(state.id(), &reply, cancel).await {
            Ok(artifact) => {
                state.set_last_audio(artifact.clone());
                (Some(artifact), None)
            }
            Err(e) => (None, Some(e)),
        };

        Some(TurnOutcome {
            user_text: user_text.to_string(),
            reply,
            via_speech,
            chat_failed,
            audio,
            synthesis_error,
        })
    }

    /// 处理语音输入，识别成功后按文本输入处理
    pub async fn process_voice(
        &self,
        state: &mut ConversationState,
        audio: Vec<u8>,
        cancel: CancellationToken,
    ) -> VoiceTurnOutcome {
        if audio.is_empty() {
            return VoiceTurnOutcome {
                transcript: None,
                transcription_error: Some("Empty recording".to_string()),
                turn: None,
            };
        }

        let language = state.settings().speech_language;
        let transcript = match self.stt.transcribe(audio, language).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    conversation_id = %state.id(),
                    error = %e,
                    "Failed to transcribe audio"
                );
                return VoiceTurnOutcome {
                    transcript: None,
                    transcription_error: Some(e.to_string()),
                    turn: None,
                };
            }
        };

        let turn = self.process_text(state, &transcript, true, cancel).await;
        VoiceTurnOutcome {
            transcript: Some(transcript),
            transcription_error: None,
            turn,
        }
    }

    async fn synthesize(
        &self,
        conversation_id: &str,
        text: &str,
        cancel: CancellationToken,
    ) -> Result<SynthesizedAudioArtifact, String> {
        self.event_publisher.publish_synthesis_started(conversation_id);

        let result = match SynthesisRequest::new(text, &self.voice) {
            Ok(request) => {
                let progress = Arc::new(ConversationProgressReporter::new(
                    self.event_publisher.clone(),
                    conversation_id,
                ));
                let ctx = SynthesisContext::new(progress, cancel);
                self.synthesizer
                    .synthesize(request, &ctx)
                    .await
                    .map_err(|e| e.to_string())
            }
            Err(e) => Err(e.to_string()),
        };

        match &result {
            Ok(artifact) => {
                let file_name = artifact.file_name().unwrap_or_default();
                self.event_publisher
                    .publish_synthesis_ready(conversation_id, file_name);
            }
            Err(e) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    error = %e,
                    "Voice synthesis failed"
                );
                self.event_publisher
                    .publish_synthesis_failed(conversation_id, e);
            }
        }

        result
    }
}
