//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_storage;
mod chat_completion;
mod conversation_store;
mod speech_synthesizer;
mod speech_to_text;

pub use audio_storage::{AudioStorageError, AudioStoragePort};
pub use chat_completion::{ChatCompletionPort, ChatError};
pub use conversation_store::{ConversationError, ConversationStorePort, SharedConversation};
pub use speech_synthesizer::{
    NoopProgress, PollError, PollProgress, ProgressReporter, SpeechSynthesizerPort,
    SubmitError, SynthesisContext, SynthesisError,
};
pub use speech_to_text::{SpeechToTextPort, SttError};
