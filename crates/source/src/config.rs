//! Data source configuration.

use dashboard_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::delimited::DelimitedFileSource;
use crate::http::HttpEventSource;
use crate::EventSource;

/// Which kind of source to read events from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Remote JSON endpoint returning `{"events": [...]}`
    #[default]
    Http,
    /// Local delimited file with a header row
    File,
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub kind: SourceKind,
    /// Events endpoint URL (http kind)
    #[serde(default = "default_url")]
    pub url: String,
    /// Path to the delimited file (file kind)
    #[serde(default = "default_path")]
    pub path: String,
    /// Field delimiter, a single ASCII character
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:8000/events".to_string()
}

fn default_path() -> String {
    "data/events.csv".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            url: default_url(),
            path: default_path(),
            delimiter: default_delimiter(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SourceConfig {
    /// The delimiter as a byte.
    pub fn delimiter_byte(&self) -> Result<u8> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => Err(Error::config(format!(
                "delimiter must be one ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }

    /// Builds the configured source.
    pub fn build(&self) -> Result<Arc<dyn EventSource>> {
        match self.kind {
            SourceKind::Http => Ok(Arc::new(HttpEventSource::new(&self.url, self.timeout_secs)?)),
            SourceKind::File => Ok(Arc::new(DelimitedFileSource::new(
                &self.path,
                self.delimiter_byte()?,
            ))),
        }
    }
}
