pub mod api;
pub mod appointment;
pub mod config;
pub mod core_state;
pub mod export;
pub mod form;
pub mod page;
pub mod pitch;
pub mod pitch_service;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, ConfigError};
use crate::core_state::CoreState;
use crate::pitch::{GeminiClient, PitchError};
use crate::pitch_service::PitchService;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Pitch client setup failed: {0}")]
    PitchClient(#[from] PitchError),
    #[error("Failed to build async runtime: {0}")]
    Runtime(std::io::Error),
    #[error("Server error: {0}")]
    Server(#[from] api::ServerError),
    #[error("Failed to listen for shutdown signal: {0}")]
    Signal(std::io::Error),
}

pub fn run() -> Result<(), StartupError> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("FieldFlow starting v{}", config::APP_VERSION);

    let config = AppConfig::from_env()?;
    if config.pitch.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY not set; pitch requests will return the error fallback");
    }

    // The blocking HTTP client must be created (and dropped) outside the runtime.
    let client = GeminiClient::new(&config.pitch)?;
    let service = PitchService::new(Box::new(client), config.pitch.temperature);
    let core = Arc::new(CoreState::new(service, config.exports_dir.clone()));
    tracing::debug!(
        model = %config.pitch.model,
        exports_dir = %config.exports_dir.display(),
        "Application state ready"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    let result = runtime.block_on(serve(core.clone(), &config));
    core.shutdown();
    drop(runtime);
    drop(core);
    result
}

async fn serve(core: Arc<CoreState>, config: &AppConfig) -> Result<(), StartupError> {
    let mut server = api::start_server(core, config.bind_addr).await?;
    tracing::info!("Open http://{} in a browser", server.session.server_addr);

    let signal = tokio::signal::ctrl_c().await;
    server.shutdown();
    server.wait().await;
    signal.map_err(StartupError::Signal)
}
