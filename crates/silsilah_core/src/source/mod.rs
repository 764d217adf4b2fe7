//! Data acquisition for flat person rows.
//!
//! # Responsibility
//! - Define the async `DataSource` contract used by the tree loader.
//! - Decode the sheet endpoint envelope and local JSON exports.
//!
//! # Invariants
//! - Sources never resolve hierarchy; they only yield rows.
//! - Acquisition failures are reported as `DataAcquisitionError`, never as
//!   resolution errors.

mod file;
mod fixture;
mod remote;

pub use file::JsonFileSource;
pub use fixture::{fixture_records, FixtureSource, FIXTURE_SOURCE_ID};
pub use remote::RemoteSource;

use crate::model::person::PersonRecord;
use async_trait::async_trait;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DEFAULT_REJECTION_MESSAGE: &str = "Failed to load data";

/// Errors while obtaining rows from a source.
#[derive(Debug)]
pub enum DataAcquisitionError {
    /// Source URL cannot be parsed.
    InvalidUrl(String),
    /// Connection, TLS or timeout failure.
    Transport(reqwest::Error),
    /// Endpoint answered with a non-success HTTP status.
    HttpStatus(u16),
    /// Body is not a valid rows document.
    Decode(serde_json::Error),
    /// Endpoint answered `success: false`.
    Rejected(String),
    /// Local file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for DataAcquisitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "invalid source url: {url}"),
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::HttpStatus(status) => write!(f, "source responded with HTTP {status}"),
            Self::Decode(err) => write!(f, "invalid rows document: {err}"),
            Self::Rejected(message) => write!(f, "source rejected request: {message}"),
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for DataAcquisitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::InvalidUrl(_) | Self::HttpStatus(_) | Self::Rejected(_) => None,
        }
    }
}

impl From<reqwest::Error> for DataAcquisitionError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for DataAcquisitionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Provider of flat person rows.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short identifier used in log events and load origins.
    fn source_id(&self) -> &str;

    /// Fetches the full row set.
    async fn fetch_records(&self) -> Result<Vec<PersonRecord>, DataAcquisitionError>;
}

/// Response shape of the sheet endpoint.
#[derive(Debug, Deserialize)]
struct RowsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<PersonRecord>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowsDocument {
    Rows(Vec<PersonRecord>),
    Envelope(RowsEnvelope),
}

/// Decodes the endpoint envelope `{ "success", "data", "error" }`.
pub fn decode_envelope(body: &[u8]) -> Result<Vec<PersonRecord>, DataAcquisitionError> {
    let envelope: RowsEnvelope = serde_json::from_slice(body)?;
    envelope_rows(envelope)
}

/// Decodes either a bare row array or an endpoint envelope.
pub fn decode_rows_document(body: &[u8]) -> Result<Vec<PersonRecord>, DataAcquisitionError> {
    match serde_json::from_slice::<RowsDocument>(body) {
        Ok(RowsDocument::Rows(rows)) => Ok(rows),
        Ok(RowsDocument::Envelope(envelope)) => envelope_rows(envelope),
        // Untagged errors carry no detail; re-run the envelope decode for a useful message.
        Err(_) => decode_envelope(body),
    }
}

fn envelope_rows(envelope: RowsEnvelope) -> Result<Vec<PersonRecord>, DataAcquisitionError> {
    if envelope.success {
        return Ok(envelope.data);
    }
    Err(DataAcquisitionError::Rejected(
        envelope
            .error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
    ))
}
