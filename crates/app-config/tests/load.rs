use std::fs;

use app_config::{Error, load_params_file, load_settings_from};
use tempfile::TempDir;

fn config_dir(base: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("base.toml"), base).unwrap();
    dir
}

#[test]
fn base_file_with_defaults() {
    let dir = config_dir(
        r#"
[api]
base_url = "https://backtest.example.com/"
"#,
    );

    let settings = load_settings_from(dir.path()).unwrap();
    assert_eq!(settings.api.base_url, "https://backtest.example.com");
    assert_eq!(settings.api.history_limit, 100);
    assert_eq!(settings.api.poll_attempts, 1);
    assert_eq!(settings.ui.theme, "dark");
    assert_eq!(settings.ui.file_refresh_secs, 30);
    assert_eq!(settings.ui.upload_max_bytes, 220 * 1024 * 1024);
    assert_eq!(settings.backtest.tp_ticks, 20);
}

#[test]
fn sections_override_defaults() {
    let dir = config_dir(
        r#"
[app]
log_level = "debug"

[api]
base_url = "http://localhost:8000"
poll_attempts = 5
poll_interval_ms = 250

[ui]
theme = "light"

[backtest]
starting_balance = 25000.0
trailing_stop = true
"#,
    );

    let settings = load_settings_from(dir.path()).unwrap();
    assert_eq!(settings.app.log_level, "debug");
    assert_eq!(settings.api.poll_attempts, 5);
    assert_eq!(settings.api.poll_interval_ms, 250);
    assert_eq!(settings.ui.theme, "light");
    assert_eq!(settings.backtest.starting_balance, 25000.0);
    assert!(settings.backtest.trailing_stop);
    assert_eq!(settings.backtest.sl_ticks, 10);
}

#[test]
fn invalid_base_url_is_rejected() {
    let dir = config_dir(
        r#"
[api]
base_url = "backtest.example.com"
"#,
    );

    let err = load_settings_from(dir.path()).unwrap_err();
    assert!(matches!(err, Error::InvalidBaseUrl(_)));
}

#[test]
fn missing_base_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(load_settings_from(dir.path()), Err(Error::LoadError(_))));
}

#[test]
fn params_file_overrides_some_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("params.toml");
    fs::write(&path, "tp_ticks = 40\nrisk_percentage = 0.02\n").unwrap();

    let params = load_params_file(&path).unwrap();
    assert_eq!(params.tp_ticks, 40);
    assert_eq!(params.risk_percentage, 0.02);
    assert_eq!(params.tick_size, 0.25);
}
