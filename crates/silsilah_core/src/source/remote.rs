//! HTTP source for the published family sheet endpoint.

use super::{decode_envelope, DataAcquisitionError, DataSource};
use crate::model::person::PersonRecord;
use async_trait::async_trait;
use log::{error, info};
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

const REMOTE_SOURCE_ID: &str = "remote";

/// Fetches rows from a JSON endpoint answering `{ success, data, error }`.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    url: Url,
    client: Client,
}

impl RemoteSource {
    /// Creates a source for `url` with a per-request timeout.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DataAcquisitionError> {
        let url = Url::parse(url.trim())
            .map_err(|_| DataAcquisitionError::InvalidUrl(url.trim().to_string()))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn fetch_inner(&self) -> Result<Vec<PersonRecord>, DataAcquisitionError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataAcquisitionError::HttpStatus(status.as_u16()));
        }
        let body = response.bytes().await?;
        decode_envelope(&body)
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    fn source_id(&self) -> &str {
        REMOTE_SOURCE_ID
    }

    async fn fetch_records(&self) -> Result<Vec<PersonRecord>, DataAcquisitionError> {
        let started_at = Instant::now();
        info!(
            "event=fetch module=source status=start source={} host={}",
            REMOTE_SOURCE_ID,
            self.url.host_str().unwrap_or("unknown")
        );
        match self.fetch_inner().await {
            Ok(records) => {
                info!(
                    "event=fetch module=source status=ok source={} records={} duration_ms={}",
                    REMOTE_SOURCE_ID,
                    records.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(records)
            }
            Err(err) => {
                error!(
                    "event=fetch module=source status=error source={} duration_ms={} error={}",
                    REMOTE_SOURCE_ID,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}
