// In crates/ingest/src/upload.rs

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::columns::normalize;
use crate::error::{Error, Result, SchemaError};

/// Largest price-data file the client will send: 220 MiB.
pub const DEFAULT_UPLOAD_LIMIT: u64 = 220 * 1024 * 1024;

/// Number of data rows shown in an upload preview.
pub const PREVIEW_ROWS: usize = 10;

const PRICE_COLUMNS: &[&str] = &["open", "high", "low", "close"];
const DATE_SPELLINGS: &[&str] = &["date_time", "datetime", "date time", "date"];

/// The first rows of a validated upload, for display before submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub size_bytes: u64,
}

/// Checks that an upload carries a date column plus open, high, low and close.
///
/// # Arguments
/// * `headers` - The raw header cells, in file order. Case and surrounding
///   whitespace are ignored.
///
/// # Returns
/// `SchemaError::MissingColumns` naming every absent column. A missing date
/// column is reported as `date_time`.
pub fn validate_upload_headers<S: AsRef<str>>(headers: &[S]) -> std::result::Result<(), SchemaError> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize(h.as_ref())).collect();
    let has = |name: &str| normalized.iter().any(|h| h == name);

    let mut missing = Vec::new();
    if !DATE_SPELLINGS.iter().any(|name| has(name)) {
        missing.push(DATE_SPELLINGS[0].to_string());
    }
    missing.extend(
        PRICE_COLUMNS
            .iter()
            .filter(|name| !has(name))
            .map(|name| name.to_string()),
    );

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns { missing })
    }
}

/// Reads the header and the first [`PREVIEW_ROWS`] rows of a price-data file.
///
/// The size limit is checked before anything is parsed, and the header is
/// validated before any preview row is returned.
pub fn inspect_upload(path: &Path, max_bytes: u64) -> Result<UploadPreview> {
    let size_bytes = std::fs::metadata(path)?.len();
    if size_bytes > max_bytes {
        return Err(Error::TooLarge {
            size: size_bytes,
            limit: max_bytes,
        });
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(File::open(path)?);

    let headers: Vec<String> = reader.byte_headers()?.iter().map(lossy).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(SchemaError::NoHeader.into());
    }
    validate_upload_headers(&headers)?;

    let mut rows = Vec::with_capacity(PREVIEW_ROWS);
    for record in reader.byte_records() {
        let record = record?;
        if record.len() <= 1 {
            continue;
        }
        rows.push(record.iter().map(lossy).collect());
        if rows.len() == PREVIEW_ROWS {
            break;
        }
    }

    tracing::info!(
        path = %path.display(),
        size = %format_bytes(size_bytes),
        columns = headers.len(),
        "Upload passed header validation."
    );
    Ok(UploadPreview {
        headers,
        rows,
        size_bytes,
    })
}

/// Preview cells are for display only, so invalid UTF-8 becomes U+FFFD.
fn lossy(cell: &[u8]) -> String {
    String::from_utf8_lossy(cell).into_owned()
}

/// Renders a byte count with two decimals, e.g. `1.50 KB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_any_case_pass() {
        assert!(validate_upload_headers(&["Date", "Open", "High", "Low", "Close"]).is_ok());
        assert!(validate_upload_headers(&[" DATE TIME ", "open", "high", "low", "close", "volume"]).is_ok());
        assert!(validate_upload_headers(&["datetime", "OPEN", "HIGH", "LOW", "CLOSE"]).is_ok());
    }

    #[test]
    fn test_missing_close_fails() {
        let err = validate_upload_headers(&["Date", "Open", "High", "Low"]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns {
                missing: vec!["close".to_string()]
            }
        );
        assert_eq!(err.to_string(), "missing required columns: close");
    }

    #[test]
    fn test_missing_date_reported_first() {
        let err = validate_upload_headers(&["timestamp", "open", "close"]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingColumns {
                missing: vec!["date_time".to_string(), "high".to_string(), "low".to_string()]
            }
        );
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512.00 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(DEFAULT_UPLOAD_LIMIT), "220.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }
}
