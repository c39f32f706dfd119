// In crates/engine/src/files.rs

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use api_client::BacktestApi;
use core_types::UploadedFile;
use events::{FileGroup, StatusLine, UiEvent};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::error::Result;

const UNCATEGORIZED: &str = "Other";

/// Groups files by category in sorted category order.
///
/// When `category` is set only files with exactly that category are kept.
/// Files without a category land in `Other`.
pub fn group_files(files: Vec<UploadedFile>, category: Option<&str>) -> Vec<FileGroup> {
    let mut grouped: BTreeMap<String, Vec<UploadedFile>> = BTreeMap::new();
    for file in files {
        if let Some(wanted) = category {
            if file.category.as_deref() != Some(wanted) {
                continue;
            }
        }
        let key = file
            .category
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        grouped.entry(key).or_default().push(file);
    }

    grouped
        .into_iter()
        .map(|(category, files)| FileGroup { category, files })
        .collect()
}

/// Fetches the uploaded-file list once and publishes it as a `FileList` event.
pub async fn refresh_files_once(
    api: &dyn BacktestApi,
    category: Option<&str>,
    events: &broadcast::Sender<UiEvent>,
) -> Result<Vec<FileGroup>> {
    let files = api.list_files().await?;
    let groups = group_files(files, category);
    tracing::debug!(groups = groups.len(), "Uploaded file list refreshed.");

    // No subscribers is fine; the list is also returned.
    let _ = events.send(UiEvent::FileList(groups.clone()));
    Ok(groups)
}

/// Spawns the periodic file-list refresh on its own task.
///
/// The first refresh runs immediately. Failures are published as error
/// status lines and the loop keeps going. Abort the handle to stop it.
pub fn spawn_file_refresh(
    api: Arc<dyn BacktestApi>,
    category: Option<String>,
    every: Duration,
    events: broadcast::Sender<UiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(err) = refresh_files_once(api.as_ref(), category.as_deref(), &events).await {
                tracing::warn!(error = %err, "File list refresh failed.");
                let _ = events.send(UiEvent::Status(StatusLine::error(format!(
                    "Error loading files: {}",
                    err
                ))));
            }
        }
    })
}
