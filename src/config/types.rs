//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::synthesis::{LanguageHint, VoiceSettings};
use crate::infrastructure::adapters::{Backoff, PollPolicy};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// OpenAI 配置（语音识别 + 对话）
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// 对话配置
    #[serde(default)]
    pub chat: ChatConfig,

    /// 语音合成配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5060
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// OpenAI 配置
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// 为空时回退到 OPENAI_API_KEY
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_openai_url")]
    pub base_url: String,

    /// 语音识别模型
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

fn default_openai_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_openai_timeout() -> u64 {
    60
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_openai_url(),
            stt_model: default_stt_model(),
            timeout_secs: default_openai_timeout(),
        }
    }
}

/// 对话配置
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// 回复长度上限，语音交互保持简短
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_chat_model() -> String {
    "gpt-4-turbo".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    250
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant. Respond concisely and conversationally.".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// 合成服务提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisProvider {
    #[default]
    Typecast,
    /// 离线合成器，不调用外部服务
    Fake,
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub provider: SynthesisProvider,

    #[serde(default = "default_typecast_url")]
    pub base_url: String,

    /// 为空时回退到 TYPECAST_API_KEY
    #[serde(default)]
    pub api_key: String,

    /// 为空时回退到 TYPECAST_ACTOR_ID，再回退到内置默认音色
    #[serde(default)]
    pub actor_id: String,

    #[serde(default)]
    pub language: LanguageHint,

    #[serde(default = "default_hd")]
    pub hd: bool,

    #[serde(default = "default_tempo")]
    pub tempo: f32,

    #[serde(default = "default_volume")]
    pub volume: u8,

    #[serde(default)]
    pub pitch: i32,

    /// 单次 HTTP 请求超时时间（秒）
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub poll: PollConfig,

    /// 离线合成器返回的固定音频，为空时生成静音
    #[serde(default)]
    pub fake_audio_file: Option<PathBuf>,
}

fn default_typecast_url() -> String {
    "https://typecast.ai".to_string()
}

fn default_hd() -> bool {
    true
}

fn default_tempo() -> f32 {
    1.1
}

fn default_volume() -> u8 {
    100
}

fn default_synthesis_timeout() -> u64 {
    30
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            provider: SynthesisProvider::default(),
            base_url: default_typecast_url(),
            api_key: String::new(),
            actor_id: String::new(),
            language: LanguageHint::Auto,
            hd: default_hd(),
            tempo: default_tempo(),
            volume: default_volume(),
            pitch: 0,
            timeout_secs: default_synthesis_timeout(),
            poll: PollConfig::default(),
            fake_audio_file: None,
        }
    }
}

impl SynthesisConfig {
    /// 构建每轮使用的音色参数
    pub fn voice_settings(&self) -> VoiceSettings {
        VoiceSettings {
            actor_id: self.actor_id.clone(),
            language: self.language,
            hd: self.hd,
            speed: self.tempo,
            volume: self.volume,
            pitch: self.pitch,
        }
    }
}

/// 轮询配置
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// 轮询间隔（毫秒）
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default)]
    pub backoff: Backoff,

    /// 指数退避的间隔上限（毫秒）
    #[serde(default = "default_max_interval_ms")]
    pub max_interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    30
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_max_interval_ms() -> u64 {
    10_000
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
            backoff: Backoff::Fixed,
            max_interval_ms: default_max_interval_ms(),
        }
    }
}

impl PollConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            max_attempts: self.max_attempts,
            interval: Duration::from_millis(self.interval_ms),
            backoff: self.backoff,
            max_interval: Duration::from_millis(self.max_interval_ms),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 合成音频存储目录
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// 上传录音最大大小（字节），默认 10MB
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio_files")
}

fn default_max_upload_size() -> u64 {
    10 * 1024 * 1024 // 10 MB
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_dir: default_audio_dir(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
