//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechSynthesizer、SpeechToText、ChatCompletion、AudioStorage、ConversationStore）
//! - pipeline: 单轮对话编排（识别 -> 回复 -> 合成）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod pipeline;
pub mod ports;
pub mod queries;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports
pub use commands::{
    // Conversation commands
    ClearConversationCommand,
    CloseConversationCommand,
    CreateConversationCommand,
    CreateConversationResponse,
    UpdateSettingsCommand,
    UpdateSettingsResponse,
    // Turn commands
    CancelTurnCommand,
    TextTurnCommand,
    VoiceTurnCommand,
    // Audio commands
    DeleteAudioCommand,
    // Handlers
    handlers::{
        CancelTurnHandler, ClearConversationHandler, CloseConversationHandler,
        CreateConversationHandler, DeleteAudioHandler, TextTurnHandler, UpdateSettingsHandler,
        VoiceTurnHandler,
    },
};

pub use error::ApplicationError;

pub use pipeline::{TurnOutcome, TurnPipeline, VoiceTurnOutcome, SYNTHESIS_FAILED_NOTICE};

pub use ports::{
    // Audio storage
    AudioStorageError,
    AudioStoragePort,
    // Chat completion
    ChatCompletionPort,
    ChatError,
    // Conversation store
    ConversationError,
    ConversationStorePort,
    SharedConversation,
    // Speech synthesizer
    NoopProgress,
    PollError,
    PollProgress,
    ProgressReporter,
    SpeechSynthesizerPort,
    SubmitError,
    SynthesisContext,
    SynthesisError,
    // Speech to text
    SpeechToTextPort,
    SttError,
};

pub use queries::{
    // Audio queries
    GetAudioQuery,
    GetAudioResponse,
    // Conversation queries
    GetConversationQuery,
    ListConversationsQuery,
    // Handlers
    handlers::{ConversationView, GetAudioHandler, GetConversationHandler, ListConversationsHandler},
};
