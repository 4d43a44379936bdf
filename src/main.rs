//! Talkback - 语音对话服务
//!
//! 录音 -> Whisper 识别 -> Chat 回复 -> Typecast 合成 -> 浏览器播放

use std::sync::Arc;

use talkback::application::{SpeechSynthesizerPort, TurnPipeline};
use talkback::config::{load_config, print_config, AppConfig, SynthesisProvider};
use talkback::infrastructure::adapters::{
    FakeTtsClient, FakeTtsClientConfig, FileAudioStorage, OpenAiChatClient, OpenAiChatConfig,
    TypecastClientConfig, TypecastTtsClient, WhisperClient, WhisperClientConfig,
};
use talkback::infrastructure::events::EventPublisher;
use talkback::infrastructure::http::{AppState, HttpServer, ServerConfig};
use talkback::infrastructure::memory::InMemoryConversationStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 中的 OPENAI_API_KEY / TYPECAST_API_KEY
    dotenvy::dotenv().ok();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Talkback - 语音对话服务");
    print_config(&config);

    // 合成音频存储
    let storage = Arc::new(FileAudioStorage::new(&config.storage.audio_dir).await?);

    // 语音识别
    let stt = Arc::new(WhisperClient::new(WhisperClientConfig {
        base_url: config.openai.base_url.clone(),
        api_key: config.openai.api_key.clone(),
        model: config.openai.stt_model.clone(),
        timeout_secs: config.openai.timeout_secs,
    })?);

    // 对话补全
    let chat = Arc::new(OpenAiChatClient::new(OpenAiChatConfig {
        base_url: config.openai.base_url.clone(),
        api_key: config.openai.api_key.clone(),
        model: config.chat.model.clone(),
        temperature: config.chat.temperature,
        max_tokens: config.chat.max_tokens,
        timeout_secs: config.openai.timeout_secs,
    })?);

    // 语音合成
    let synthesizer: Arc<dyn SpeechSynthesizerPort> = match config.synthesis.provider {
        SynthesisProvider::Typecast => {
            let tts_config = TypecastClientConfig::new(
                &config.synthesis.base_url,
                &config.synthesis.api_key,
            )
            .with_timeout(config.synthesis.timeout_secs)
            .with_poll_policy(config.synthesis.poll.policy());
            Arc::new(TypecastTtsClient::new(tts_config, storage.clone())?)
        }
        // 离线合成器（测试用，始终返回固定音频）
        SynthesisProvider::Fake => {
            let tts_config = FakeTtsClientConfig {
                audio_file_path: config.synthesis.fake_audio_file.clone(),
                ..Default::default()
            };
            Arc::new(FakeTtsClient::new(tts_config, storage.clone())?)
        }
    };

    // 创建事件发布器
    let event_publisher = EventPublisher::new().arc();

    // 单轮对话编排
    let pipeline = Arc::new(TurnPipeline::new(
        chat,
        stt,
        synthesizer,
        event_publisher.clone(),
        config.synthesis.voice_settings(),
        config.chat.system_prompt.clone(),
    ));

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_files(
            &config.server.static_files.dir,
            &config.server.static_files.path,
        );
    }

    let state = AppState::new(
        InMemoryConversationStore::new().arc(),
        storage,
        pipeline,
        event_publisher,
    )
    .with_max_upload_size(config.storage.max_upload_size as usize);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于配置
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},talkback={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
