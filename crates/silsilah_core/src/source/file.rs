//! Local JSON export source.

use super::{decode_rows_document, DataAcquisitionError, DataSource};
use crate::model::person::PersonRecord;
use async_trait::async_trait;
use log::{error, info};
use std::path::{Path, PathBuf};

const FILE_SOURCE_ID: &str = "file";

/// Reads rows from a JSON file holding a bare array or an endpoint envelope.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataSource for JsonFileSource {
    fn source_id(&self) -> &str {
        FILE_SOURCE_ID
    }

    async fn fetch_records(&self) -> Result<Vec<PersonRecord>, DataAcquisitionError> {
        let result = tokio::fs::read(&self.path)
            .await
            .map_err(|source| DataAcquisitionError::Io {
                path: self.path.clone(),
                source,
            })
            .and_then(|body| decode_rows_document(&body));
        match &result {
            Ok(records) => info!(
                "event=fetch module=source status=ok source={} records={}",
                FILE_SOURCE_ID,
                records.len()
            ),
            Err(err) => error!(
                "event=fetch module=source status=error source={} error={}",
                FILE_SOURCE_ID, err
            ),
        }
        result
    }
}
