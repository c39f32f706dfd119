use std::io::Write;

use ingest::{Error, SchemaError, inspect_upload, PREVIEW_ROWS};
use tempfile::NamedTempFile;

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn preview_is_capped_at_ten_rows() {
    let mut contents = String::from("Date Time,Open,High,Low,Close,Volume\n");
    for i in 0..25 {
        contents.push_str(&format!("2024-01-01 00:{i:02}:00,1,2,0.5,1.5,100\n"));
    }
    let file = write_csv(&contents);

    let preview = inspect_upload(file.path(), 1024 * 1024).unwrap();
    assert_eq!(preview.headers.len(), 6);
    assert_eq!(preview.rows.len(), PREVIEW_ROWS);
    assert_eq!(preview.rows[0][0], "2024-01-01 00:00:00");
    assert_eq!(preview.size_bytes, contents.len() as u64);
}

#[test]
fn oversized_file_is_rejected_before_parsing() {
    let file = write_csv("not,even,a,price,file\n1,2,3,4,5\n");

    let err = inspect_upload(file.path(), 4).unwrap_err();
    assert!(matches!(err, Error::TooLarge { limit: 4, .. }));
}

#[test]
fn missing_columns_stop_the_upload() {
    let file = write_csv("date,open,high,low\n2024-01-01,1,2,0.5\n");

    let err = inspect_upload(file.path(), 1024).unwrap_err();
    match err {
        Error::Schema(SchemaError::MissingColumns { missing }) => assert_eq!(missing, vec!["close"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_file_has_no_header() {
    let file = write_csv("");

    let err = inspect_upload(file.path(), 1024).unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::NoHeader)));
}

#[test]
fn invalid_utf8_in_preview_rows_does_not_block_the_upload() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"date,open,high,low,close,note\n2024-01-01,1,2,0.5,1.5,caf\xe9\n")
        .unwrap();
    file.flush().unwrap();

    let preview = inspect_upload(file.path(), 1024).unwrap();
    assert_eq!(preview.rows.len(), 1);
    assert_eq!(preview.rows[0][1], "1");
    assert_eq!(preview.rows[0][5], "caf\u{fffd}");
}
