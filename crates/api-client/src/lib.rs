// In crates/api-client/src/lib.rs

use std::time::Duration;

use app_config::ApiSettings;
use async_trait::async_trait;
use core_types::{HistoryItem, UploadedFile};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

/// The backend operations the client depends on.
///
/// Implemented over HTTP by [`HttpApiClient`]; tests substitute an in-memory
/// implementation.
#[async_trait]
pub trait BacktestApi: Send + Sync {
    /// The normalized base URL, without a trailing slash.
    fn base_url(&self) -> &str;

    /// Uploads price data and starts a backtest. Returns the run id.
    async fn submit_backtest(&self, request: SubmitRequest) -> Result<String>;

    async fn backtest_detail(&self, id: &str) -> Result<BacktestDetail>;

    async fn list_historical(&self, limit: usize) -> Result<Vec<HistoryItem>>;

    async fn historical_result(&self, id: &str) -> Result<HistoricalResult>;

    /// Fetches a text artifact, such as the trades CSV, from an absolute URL.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    async fn list_files(&self) -> Result<Vec<UploadedFile>>;
}

/// [`BacktestApi`] over HTTP with `reqwest`.
pub struct HttpApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    /// Constructs a new client from the API settings.
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reads the body of a response, turning non-2xx statuses into errors.
    async fn checked_text(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let text = response.text().await.map_err(Error::RequestFailed)?;
        if !status.is_success() {
            return Err(Error::Status {
                code: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let text = Self::checked_text(response).await?;
        let value: T = serde_json::from_str(&text).map_err(Error::DeserializationFailed)?;
        Ok(value)
    }
}

#[async_trait]
impl BacktestApi for HttpApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `POST /backtests` as multipart form data.
    ///
    /// # Arguments
    ///
    /// * `request`: The file contents plus `params_json`, `category` and `symbol` fields.
    ///
    /// # Returns
    ///
    /// The id the backend assigned to the run.
    async fn submit_backtest(&self, request: SubmitRequest) -> Result<String> {
        let params_json = serde_json::to_string(&request.params).map_err(Error::DeserializationFailed)?;
        let file_part = Part::bytes(request.file_bytes).file_name(request.file_name.clone());
        let form = Form::new()
            .part("file", file_part)
            .text("params_json", params_json)
            .text("category", request.category)
            .text("symbol", request.symbol);

        let url = join_url(&self.base_url, "/backtests");
        tracing::info!(url = %url, file = %request.file_name, "Submitting backtest.");

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let text = Self::checked_text(response).await?;
        let ack: SubmitResponse = serde_json::from_str(&text).map_err(Error::DeserializationFailed)?;
        Ok(ack.id)
    }

    async fn backtest_detail(&self, id: &str) -> Result<BacktestDetail> {
        self.get_json(&join_url(&self.base_url, &format!("/backtests/{}", id)))
            .await
    }

    async fn list_historical(&self, limit: usize) -> Result<Vec<HistoryItem>> {
        self.get_json(&join_url(
            &self.base_url,
            &format!("/api/historical-data/?limit={}", limit),
        ))
        .await
    }

    async fn historical_result(&self, id: &str) -> Result<HistoricalResult> {
        self.get_json(&join_url(&self.base_url, &format!("/api/historical-data/{}", id)))
            .await
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        tracing::debug!(url = %url, "GET text");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(Error::RequestFailed)?;
        Self::checked_text(response).await
    }

    async fn list_files(&self) -> Result<Vec<UploadedFile>> {
        self.get_json(&join_url(&self.base_url, "/api/files/")).await
    }
}

/// Joins a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// The public download URL of a server-side artifact path.
///
/// Only the basename of `path` is kept: `/data/out/trades_42.csv` becomes
/// `{base}/downloads/trades_42.csv`. Returns `None` for an empty basename.
pub fn download_url(base: &str, path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if name.is_empty() {
        return None;
    }
    Some(join_url(base, &format!("downloads/{}", name)))
}
