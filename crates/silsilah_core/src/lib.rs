//! Core domain logic for Silsilah.
//! Resolves flat family sheet rows into a single-rooted family tree.

pub mod config;
pub mod logging;
pub mod model;
pub mod resolve;
pub mod search;
pub mod service;
pub mod source;

pub use config::{AppConfig, ConfigError, LoggingConfig, SourceConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::person::{normalize_text, PersonRecord, ABSENT_SENTINEL};
pub use model::tree::{FamilyTree, PersonNode, Spouse};
pub use resolve::{
    resolve, DiscardedRoot, HierarchyResolver, OrphanPolicy, Resolution, ResolutionDiagnostics,
    ResolutionError, ResolveOptions, ShadowedName, ROOT_SENTINEL_ID,
};
pub use search::member::{search_member, search_members};
pub use service::app_state::AppState;
pub use service::detail::{LifeStatus, PersonDetail, SpouseDetail};
pub use service::loader::{DataOrigin, LoadError, LoadedTree, TreeLoader};
pub use service::store::{PublishOutcome, RefreshTicket, TreeSnapshot, TreeStore};
pub use source::{
    decode_envelope, decode_rows_document, fixture_records, DataAcquisitionError, DataSource,
    FixtureSource, JsonFileSource, RemoteSource,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
