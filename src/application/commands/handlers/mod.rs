//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod audio_handlers;
mod conversation_handlers;
mod turn_handlers;

pub use audio_handlers::*;
pub use conversation_handlers::*;
pub use turn_handlers::*;
