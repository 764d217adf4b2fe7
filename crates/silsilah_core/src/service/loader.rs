//! Tree loading use-case.
//!
//! # Responsibility
//! - Fetch rows from the configured source and fall back to the fixture on
//!   acquisition failure.
//! - Resolve rows into a tree and surface resolution errors unchanged.
//!
//! # Invariants
//! - Acquisition errors never escape `load`; they are recorded in the origin.
//! - `load_without_fallback` never serves fixture rows for a failed source.
//! - Resolution errors are never replaced by fixture data.

use crate::model::person::PersonRecord;
use crate::resolve::{HierarchyResolver, Resolution, ResolutionError, ResolveOptions};
use crate::source::{fixture_records, DataAcquisitionError, DataSource};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const NO_SOURCE_REASON: &str = "no source configured";

/// Where the rows of a loaded tree came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataOrigin {
    /// Configured source answered successfully.
    Source { source_id: String },
    /// Fixture rows were used instead; `reason` says why.
    Fixture { reason: String },
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fixture { .. })
    }
}

/// Resolved tree plus acquisition metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedTree {
    pub resolution: Resolution,
    pub origin: DataOrigin,
    /// Rows handed to the resolver.
    pub record_count: usize,
}

/// Failure of a load that does not fall back to the fixture.
#[derive(Debug)]
pub enum LoadError {
    /// Configured source could not deliver rows.
    Acquisition(DataAcquisitionError),
    /// Delivered rows do not form a valid tree.
    Resolution(ResolutionError),
}

impl LoadError {
    pub fn is_acquisition(&self) -> bool {
        matches!(self, Self::Acquisition(_))
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Acquisition(err) => write!(f, "data acquisition failed: {err}"),
            Self::Resolution(err) => write!(f, "invalid family data: {err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Acquisition(err) => Some(err),
            Self::Resolution(err) => Some(err),
        }
    }
}

impl From<DataAcquisitionError> for LoadError {
    fn from(value: DataAcquisitionError) -> Self {
        Self::Acquisition(value)
    }
}

impl From<ResolutionError> for LoadError {
    fn from(value: ResolutionError) -> Self {
        Self::Resolution(value)
    }
}

/// Loads and resolves the family tree.
pub struct TreeLoader {
    primary: Option<Box<dyn DataSource>>,
    resolver: HierarchyResolver,
}

impl TreeLoader {
    /// Loader that fetches from `source` and falls back to the fixture.
    pub fn new(source: Box<dyn DataSource>) -> Self {
        Self {
            primary: Some(source),
            resolver: HierarchyResolver::default(),
        }
    }

    /// Loader without a configured source; always serves the fixture.
    pub fn fixture_only() -> Self {
        Self {
            primary: None,
            resolver: HierarchyResolver::default(),
        }
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.resolver = HierarchyResolver::new(options);
        self
    }

    /// Fetches, falls back when needed, and resolves.
    ///
    /// # Errors
    /// - Returns `ResolutionError` when the acquired rows are structurally
    ///   invalid. Fetch failures are not errors; see `LoadedTree::origin`.
    pub async fn load(&self) -> Result<LoadedTree, ResolutionError> {
        let (records, origin) = match self.fetch().await {
            Ok(acquired) => acquired,
            Err((source_id, err)) => {
                warn!(
                    "event=fallback module=service status=fixture source={} error={}",
                    source_id, err
                );
                (
                    fixture_records(),
                    DataOrigin::Fixture {
                        reason: err.to_string(),
                    },
                )
            }
        };
        self.finish(records, origin)
    }

    /// Fetches and resolves without substituting fixture rows.
    ///
    /// A loader without a source still serves the fixture, since that is its
    /// only data.
    ///
    /// # Errors
    /// - `LoadError::Acquisition` when the configured source fails.
    /// - `LoadError::Resolution` when the rows are structurally invalid.
    pub async fn load_without_fallback(&self) -> Result<LoadedTree, LoadError> {
        let (records, origin) = self.fetch().await.map_err(|(_, err)| err)?;
        Ok(self.finish(records, origin)?)
    }

    fn finish(
        &self,
        records: Vec<PersonRecord>,
        origin: DataOrigin,
    ) -> Result<LoadedTree, ResolutionError> {
        let record_count = records.len();
        let resolution = self.resolver.resolve(&records)?;
        Ok(LoadedTree {
            resolution,
            origin,
            record_count,
        })
    }

    async fn fetch(
        &self,
    ) -> Result<(Vec<PersonRecord>, DataOrigin), (&str, DataAcquisitionError)> {
        let Some(source) = self.primary.as_deref() else {
            info!("event=fallback module=service status=fixture reason=no_source");
            return Ok((
                fixture_records(),
                DataOrigin::Fixture {
                    reason: NO_SOURCE_REASON.to_string(),
                },
            ));
        };

        match source.fetch_records().await {
            Ok(records) => Ok((
                records,
                DataOrigin::Source {
                    source_id: source.source_id().to_string(),
                },
            )),
            Err(err) => Err((source.source_id(), err)),
        }
    }
}
