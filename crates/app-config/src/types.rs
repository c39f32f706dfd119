// In crates/app-config/src/types.rs

use serde::Deserialize;

use core_types::BacktestParams;

/// Largest upload accepted by default: 220 MiB.
pub const DEFAULT_UPLOAD_MAX_BYTES: u64 = 220 * 1024 * 1024;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    #[serde(default)]
    pub app: AppSettings,
    /// Where the backtest backend lives and how to talk to it.
    pub api: ApiSettings,
    #[serde(default)]
    pub ui: UiSettings,
    /// Run parameters used when none are given on the command line.
    #[serde(default)]
    pub backtest: BacktestParams,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    #[serde(default = "default_environment")]
    pub environment: String,
    /// The log level for the application.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiSettings {
    /// Backend root, without a trailing slash once loaded.
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// How many stored results the history view asks for.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Detail fetches per run while the backend still reports work in progress.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: default_request_timeout_secs(),
            history_limit: default_history_limit(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct UiSettings {
    /// `dark` or `light`.
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_file_refresh_secs")]
    pub file_refresh_secs: u64,
    #[serde(default = "default_upload_max_bytes")]
    pub upload_max_bytes: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            file_refresh_secs: default_file_refresh_secs(),
            upload_max_bytes: default_upload_max_bytes(),
        }
    }
}

fn default_environment() -> String {
    "development".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_history_limit() -> usize {
    100
}

fn default_poll_attempts() -> u32 {
    1
}

fn default_poll_interval_ms() -> u64 {
    2000
}

fn default_theme() -> String {
    "dark".into()
}

fn default_file_refresh_secs() -> u64 {
    30
}

fn default_upload_max_bytes() -> u64 {
    DEFAULT_UPLOAD_MAX_BYTES
}
