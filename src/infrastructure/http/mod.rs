//! HTTP Layer - RESTful API + WebSocket
//!
//! 对话、轮次、音频三组接口，合成事件通过 WebSocket 推送

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
