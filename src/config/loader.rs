//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值
//!
//! 未设置的密钥和音色再回退到服务商的通用环境变量

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, SynthesisProvider};
use crate::domain::synthesis::DEFAULT_ACTOR_ID;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const TYPECAST_API_KEY_VAR: &str = "TYPECAST_API_KEY";
pub const TYPECAST_ACTOR_ID_VAR: &str = "TYPECAST_ACTOR_ID";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TALKBACK_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `TALKBACK_SERVER__PORT=8080`
/// - `TALKBACK_SYNTHESIS__POLL__MAX_ATTEMPTS=60`
/// - `TALKBACK_SYNTHESIS__PROVIDER=fake`
/// - `OPENAI_API_KEY=sk-...`（`openai.api_key` 未设置时使用）
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with_env(config_path, |key| std::env::var(key).ok())
}

/// 加载配置，`lookup` 提供回退用的环境变量
pub fn load_config_with_env<F>(config_path: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5060)?
        .set_default("openai.base_url", "https://api.openai.com")?
        .set_default("openai.stt_model", "whisper-1")?
        .set_default("openai.timeout_secs", 60)?
        .set_default("chat.model", "gpt-4-turbo")?
        .set_default("chat.temperature", 0.7)?
        .set_default("chat.max_tokens", 250)?
        .set_default("synthesis.provider", "typecast")?
        .set_default("synthesis.base_url", "https://typecast.ai")?
        .set_default("synthesis.language", "auto")?
        .set_default("synthesis.hd", true)?
        .set_default("synthesis.tempo", 1.1)?
        .set_default("synthesis.volume", 100)?
        .set_default("synthesis.pitch", 0)?
        .set_default("synthesis.timeout_secs", 30)?
        .set_default("synthesis.poll.max_attempts", 30)?
        .set_default("synthesis.poll.interval_ms", 1000)?
        .set_default("synthesis.poll.backoff", "fixed")?
        .set_default("synthesis.poll.max_interval_ms", 10_000)?
        .set_default("storage.audio_dir", "audio_files")?
        .set_default("storage.max_upload_size", 10 * 1024 * 1024)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: TALKBACK_
    // 层级分隔符: __ (双下划线)
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("TALKBACK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 服务商环境变量回退
    apply_env_fallbacks(&mut app_config, lookup);

    // 7. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 填充未配置的密钥和音色
fn apply_env_fallbacks<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if config.openai.api_key.is_empty() {
        config.openai.api_key = lookup(OPENAI_API_KEY_VAR).unwrap_or_default();
    }
    if config.synthesis.api_key.is_empty() {
        config.synthesis.api_key = lookup(TYPECAST_API_KEY_VAR).unwrap_or_default();
    }
    if config.synthesis.actor_id.is_empty() {
        config.synthesis.actor_id = lookup(TYPECAST_ACTOR_ID_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_ACTOR_ID.to_string());
    }
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.openai.api_key.is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "OpenAI API key is missing (set openai.api_key or {})",
            OPENAI_API_KEY_VAR
        )));
    }

    if config.synthesis.provider == SynthesisProvider::Typecast
        && config.synthesis.api_key.is_empty()
    {
        return Err(ConfigError::ValidationError(format!(
            "Typecast API key is missing (set synthesis.api_key or {})",
            TYPECAST_API_KEY_VAR
        )));
    }

    if config.synthesis.poll.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "Poll max_attempts cannot be 0".to_string(),
        ));
    }

    config
        .synthesis
        .voice_settings()
        .validate()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    if !(0.0..=2.0).contains(&config.chat.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "Chat temperature out of range: {}",
            config.chat.temperature
        )));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志），不输出密钥
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Chat Model: {}", config.chat.model);
    tracing::info!("STT Model: {}", config.openai.stt_model);
    tracing::info!("Synthesis Provider: {:?}", config.synthesis.provider);
    tracing::info!("Synthesis URL: {}", config.synthesis.base_url);
    tracing::info!("Voice Actor: {}", config.synthesis.actor_id);
    tracing::info!(
        "Poll: {} attempts, {}ms interval ({:?}), worst case wait {:?}",
        config.synthesis.poll.max_attempts,
        config.synthesis.poll.interval_ms,
        config.synthesis.poll.backoff,
        config.synthesis.poll.policy().worst_case_wait()
    );
    tracing::info!("Audio Directory: {:?}", config.storage.audio_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
