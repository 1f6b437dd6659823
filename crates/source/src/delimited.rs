//! Local delimited-file source.

use async_trait::async_trait;
use csv::ReaderBuilder;
use dashboard_core::{error::IngestErrorCode, Error, RawTable, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::EventSource;

/// Reads events from a delimited text file with a header row.
#[derive(Debug, Clone)]
pub struct DelimitedFileSource {
    path: PathBuf,
    delimiter: u8,
}

impl DelimitedFileSource {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }
}

#[async_trait]
impl EventSource for DelimitedFileSource {
    async fn fetch(&self) -> Result<RawTable> {
        debug!(path = %self.path.display(), "Reading events file");

        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to read events file");
            Error::ingestion(
                IngestErrorCode::Unreachable,
                format!("cannot read {}: {}", self.path.display(), e),
            )
        })?;

        parse_delimited(&bytes, self.delimiter)
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// Parses delimited text. Header names are kept as written, duplicates included.
pub fn parse_delimited(bytes: &[u8], delimiter: u8) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| Error::parse(format!("failed to read header row: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut table = RawTable::new(headers);
    for (i, result) in rdr.records().enumerate() {
        let record =
            result.map_err(|e| Error::parse(format!("failed to read record {}: {}", i + 1, e)))?;
        table.push_row(record.iter().map(coerce_cell).collect());
    }

    Ok(table)
}

/// Blank cells are null; everything else keeps its source text.
///
/// Typing happens in the normalizer, per schema field, so ids and zip
/// codes that look numeric are never rewritten.
fn coerce_cell(s: &str) -> Value {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        Value::String(trimmed.to_string())
    }
}
