//! HTTP Handlers

mod audio;
mod conversation;
mod ping;
mod turn;
mod websocket;

pub use audio::*;
pub use conversation::*;
pub use ping::*;
pub use turn::*;
pub use websocket::*;
