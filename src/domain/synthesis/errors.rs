//! Synthesis Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SynthesisRequestError {
    #[error("合成文本不能为空")]
    EmptyText,

    #[error("音色 ID 不能为空")]
    EmptyActorId,

    #[error("音量必须在 0 到 100 之间: {0}")]
    InvalidVolume(u8),

    #[error("语速必须大于 0: {0}")]
    InvalidSpeed(f32),
}
