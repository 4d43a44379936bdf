//! Talkback - 语音对话服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Synthesis Context: 合成请求、任务句柄、音频产物
//! - Conversation Context: 对话历史与设置
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechSynthesizer, SpeechToText, ChatCompletion, AudioStorage, ConversationStore）
//! - Pipeline: 识别 -> 回复 -> 合成
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Typecast 合成客户端, Whisper 识别, Chat 补全, 文件存储
//! - Memory: 对话内存存储
//! - HTTP: RESTful API + WebSocket
//! - Events: WebSocket 事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
