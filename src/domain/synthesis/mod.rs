//! Synthesis Context - 语音合成限界上下文
//!
//! 职责:
//! - 合成请求的构建与校验
//! - 合成任务句柄与轮询结果
//! - 合成音频产物

mod errors;
mod value_objects;

pub use errors::SynthesisRequestError;
pub use value_objects::{
    JobHandle, LanguageHint, PollResult, SynthesisRequest, SynthesizedAudioArtifact,
    VoiceSettings, DEFAULT_ACTOR_ID,
};
