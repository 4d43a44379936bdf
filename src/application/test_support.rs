//! 应用层测试替身

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::application::pipeline::TurnPipeline;
use crate::application::ports::{
    AudioStoragePort, ChatCompletionPort, ChatError, PollError, SpeechSynthesizerPort,
    SpeechToTextPort, SttError, SynthesisContext, SynthesisError,
};
use crate::domain::conversation::ChatMessage;
use crate::domain::synthesis::{
    LanguageHint, SynthesisRequest, SynthesizedAudioArtifact, VoiceSettings,
};
use crate::infrastructure::adapters::FileAudioStorage;
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::memory::InMemoryConversationStore;

pub const TEST_SYSTEM_PROMPT: &str = "You are a test assistant.";

/// 固定回复的语言模型
pub struct ScriptedChat {
    reply: Result<String, String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChat {
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.calls.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ChatCompletionPort for ScriptedChat {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push(messages);
        self.reply.clone().map_err(ChatError::ServiceError)
    }
}

/// 固定识别结果
pub struct ScriptedStt {
    transcript: Result<String, String>,
    languages: Mutex<Vec<LanguageHint>>,
}

impl ScriptedStt {
    pub fn languages(&self) -> Vec<LanguageHint> {
        self.languages.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechToTextPort for ScriptedStt {
    async fn transcribe(&self, _audio: Vec<u8>, language: LanguageHint) -> Result<String, SttError> {
        self.languages.lock().unwrap().push(language);
        self.transcript.clone().map_err(SttError::ServiceError)
    }
}

/// 记录合成文本，成功时写入 8 字节音频
pub struct RecordingSynthesizer {
    succeed: bool,
    storage: Arc<dyn AudioStoragePort>,
    texts: Mutex<Vec<String>>,
}

impl RecordingSynthesizer {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizerPort for RecordingSynthesizer {
    async fn synthesize(
        &self,
        request: SynthesisRequest,
        ctx: &SynthesisContext,
    ) -> Result<SynthesizedAudioArtifact, SynthesisError> {
        self.texts.lock().unwrap().push(request.text().to_string());
        if ctx.cancel.is_cancelled() {
            return Err(PollError::Cancelled.into());
        }
        if !self.succeed {
            return Err(PollError::Timeout(30).into());
        }

        let path = self
            .storage
            .save_audio(b"RIFFWAVE")
            .await
            .map_err(|e| SynthesisError::Storage(e.to_string()))?;
        Ok(SynthesizedAudioArtifact::new(path, request.text(), 8))
    }
}

/// 组装好的应用层依赖
pub struct Fixture {
    pub pipeline: Arc<TurnPipeline>,
    pub chat: Arc<ScriptedChat>,
    pub stt: Arc<ScriptedStt>,
    pub synthesizer: Arc<RecordingSynthesizer>,
    pub events: Arc<EventPublisher>,
    pub storage: Arc<FileAudioStorage>,
    pub store: Arc<InMemoryConversationStore>,
    _dir: TempDir,
}

impl Fixture {
    pub async fn new(
        reply: Result<&str, &str>,
        transcript: Result<&str, &str>,
        synthesis_succeeds: bool,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileAudioStorage::new(dir.path()).await.unwrap());

        let chat = Arc::new(ScriptedChat {
            reply: reply.map(String::from).map_err(String::from),
            calls: Mutex::new(Vec::new()),
        });
        let stt = Arc::new(ScriptedStt {
            transcript: transcript.map(String::from).map_err(String::from),
            languages: Mutex::new(Vec::new()),
        });
        let synthesizer = Arc::new(RecordingSynthesizer {
            succeed: synthesis_succeeds,
            storage: storage.clone(),
            texts: Mutex::new(Vec::new()),
        });
        let events = EventPublisher::new().arc();

        let pipeline = Arc::new(TurnPipeline::new(
            chat.clone(),
            stt.clone(),
            synthesizer.clone(),
            events.clone(),
            VoiceSettings::default(),
            TEST_SYSTEM_PROMPT,
        ));

        Self {
            pipeline,
            chat,
            stt,
            synthesizer,
            events,
            storage,
            store: InMemoryConversationStore::new().arc(),
            _dir: dir,
        }
    }
}
