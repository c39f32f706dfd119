// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File};
use core_types::BacktestParams;

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{ApiSettings, AppSettings, DEFAULT_UPLOAD_MAX_BYTES, Settings, UiSettings};

/// Loads the application settings from the `config/` directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new("config"))
}

/// Loads the application settings from various sources.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file in `dir`.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`).
/// 3. Merges settings from environment variables.
///
/// The API base URL is validated and its trailing slash removed.
pub fn load_settings_from(dir: &Path) -> Result<Settings> {
    // Get the current environment. Default to "development" if not set.
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

    let settings = Config::builder()
        // 1. Load the base configuration file.
        .add_source(File::from(dir.join("base.toml")))
        // 2. Load the environment-specific configuration file.
        .add_source(File::from(dir.join(format!("{}.toml", environment))).required(false))
        // 3. Load settings from environment variables (e.g., `APP__API__BASE_URL=...`).
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    // Deserialize the configuration into our `Settings` struct.
    let mut settings: Settings = settings.try_deserialize()?;
    settings.api.base_url = normalize_base_url(&settings.api.base_url)?;

    Ok(settings)
}

/// Checks the scheme of a base URL and strips trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(Error::InvalidBaseUrl(raw.to_string()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Loads backtest parameter overrides from a TOML file.
///
/// Keys left out of the file keep their default values.
pub fn load_params_file(path: &Path) -> Result<BacktestParams> {
    let content = std::fs::read_to_string(path)?;

    let params: BacktestParams = toml::from_str(&content)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/").unwrap(),
            "https://api.example.com"
        );
        assert_eq!(
            normalize_base_url(" http://localhost:8000 ").unwrap(),
            "http://localhost:8000"
        );
        assert!(matches!(
            normalize_base_url("ftp://example.com"),
            Err(Error::InvalidBaseUrl(_))
        ));
        assert!(normalize_base_url("localhost:8000").is_err());
    }
}
