//! Output formatting and persistence for feedback results.
//!
//! Supports pretty JSON on stdout or to a file, and CSV append.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::record::FeedbackRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Prints a value as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file(path: &str, value: &impl Serialize) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, body).with_context(|| format!("failed to write {path}"))?;
    Ok(())
}

/// Appends [`FeedbackRecord`]s as CSV rows, writing the header only for a
/// new or empty file.
pub fn append_records(path: &str, records: &[FeedbackRecord]) -> Result<()> {
    let file_exists = Path::new(path)
        .metadata()
        .map(|m| m.len() > 0)
        .unwrap_or(false);
    debug!(path, file_exists, rows = records.len(), "Appending CSV records");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open {path}"))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
