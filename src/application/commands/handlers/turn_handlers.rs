//! Turn Command Handlers
//!
//! 同一对话的轮次通过对话锁串行执行

use std::sync::Arc;

use crate::application::commands::turn_commands::*;
use crate::application::error::ApplicationError;
use crate::application::pipeline::{TurnOutcome, TurnPipeline, VoiceTurnOutcome};
use crate::application::ports::ConversationStorePort;

/// TextTurn Handler - 文本输入
pub struct TextTurnHandler {
    store: Arc<dyn ConversationStorePort>,
    pipeline: Arc<TurnPipeline>,
}

impl TextTurnHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>, pipeline: Arc<TurnPipeline>) -> Self {
        Self { store, pipeline }
    }

    pub async fn handle(&self, cmd: TextTurnCommand) -> Result<TurnOutcome, ApplicationError> {
        if cmd.text.trim().is_empty() {
            return Err(ApplicationError::validation("Message text is empty"));
        }

        let shared = self.store.get(&cmd.conversation_id)?;
        let mut state = shared.lock().await;
        // 拿到锁之后再换令牌，取消只作用于正在执行的轮次
        let cancel = self.store.begin_turn(&cmd.conversation_id)?;

        let outcome = self
            .pipeline
            .process_text(&mut state, &cmd.text, false, cancel)
            .await
            .ok_or_else(|| ApplicationError::validation("Message text is empty"))?;

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            turns = state.turns().len(),
            has_audio = outcome.audio.is_some(),
            "Text turn processed"
        );
        Ok(outcome)
    }
}

/// VoiceTurn Handler - 语音输入
pub struct VoiceTurnHandler {
    store: Arc<dyn ConversationStorePort>,
    pipeline: Arc<TurnPipeline>,
}

impl VoiceTurnHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>, pipeline: Arc<TurnPipeline>) -> Self {
        Self { store, pipeline }
    }

    pub async fn handle(&self, cmd: VoiceTurnCommand) -> Result<VoiceTurnOutcome, ApplicationError> {
        if cmd.audio.is_empty() {
            return Err(ApplicationError::validation("Recording is empty"));
        }

        let shared = self.store.get(&cmd.conversation_id)?;
        let mut state = shared.lock().await;
        let cancel = self.store.begin_turn(&cmd.conversation_id)?;

        let audio_bytes = cmd.audio.len();
        let outcome = self
            .pipeline
            .process_voice(&mut state, cmd.audio, cancel)
            .await;

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            audio_bytes = audio_bytes,
            transcribed = outcome.transcript.is_some(),
            "Voice turn processed"
        );
        Ok(outcome)
    }
}

/// CancelTurn Handler - 取消进行中的合成
pub struct CancelTurnHandler {
    store: Arc<dyn ConversationStorePort>,
}

impl CancelTurnHandler {
    pub fn new(store: Arc<dyn ConversationStorePort>) -> Self {
        Self { store }
    }

    pub fn handle(&self, cmd: CancelTurnCommand) -> Result<(), ApplicationError> {
        self.store.cancel_turn(&cmd.conversation_id)?;
        Ok(())
    }
}
