use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "FieldFlow";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PITCH_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_PITCH_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_PITCH_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_PITCH_TIMEOUT_SECS: u64 = 60;

/// Delay before the simulated submit is acknowledged.
pub const SUBMIT_DELAY: Duration = Duration::from_millis(800);
/// How long the submit success notice stays visible.
pub const SUBMIT_NOTICE_DURATION: Duration = Duration::from_millis(5000);

/// Default `EnvFilter` directives when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,fieldflow_lib=debug"
}

/// Get the application data directory
/// ~/FieldFlow/ on all platforms; falls back to the working directory
/// when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the exports directory (saved CSV / PDF artifacts)
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Settings for the generative-text client. Passed explicitly to the
/// pitch service; nothing reads the environment after startup.
#[derive(Debug, Clone)]
pub struct PitchConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_PITCH_MODEL.to_string(),
            endpoint: DEFAULT_PITCH_ENDPOINT.to_string(),
            temperature: DEFAULT_PITCH_TEMPERATURE,
            timeout_secs: DEFAULT_PITCH_TIMEOUT_SECS,
        }
    }
}

/// Process configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub exports_dir: PathBuf,
    pub pitch: PitchConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary key lookup.
    ///
    /// Recognized keys: `FIELDFLOW_BIND`, `FIELDFLOW_EXPORTS_DIR`,
    /// `GEMINI_API_KEY` (falls back to `API_KEY`), `FIELDFLOW_PITCH_MODEL`,
    /// `FIELDFLOW_PITCH_ENDPOINT`, `FIELDFLOW_PITCH_TIMEOUT_SECS`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = non_empty("FIELDFLOW_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: "FIELDFLOW_BIND",
            value: bind_raw.clone(),
        })?;

        let exports_dir = non_empty("FIELDFLOW_EXPORTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(exports_dir);

        let timeout_secs = match non_empty("FIELDFLOW_PITCH_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "FIELDFLOW_PITCH_TIMEOUT_SECS",
                value: raw,
            })?,
            None => DEFAULT_PITCH_TIMEOUT_SECS,
        };

        let pitch = PitchConfig {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            model: non_empty("FIELDFLOW_PITCH_MODEL").unwrap_or_else(|| DEFAULT_PITCH_MODEL.to_string()),
            endpoint: non_empty("FIELDFLOW_PITCH_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_PITCH_ENDPOINT.to_string()),
            temperature: DEFAULT_PITCH_TEMPERATURE,
            timeout_secs,
        };

        Ok(Self {
            bind_addr,
            exports_dir,
            pitch,
        })
    }
}
