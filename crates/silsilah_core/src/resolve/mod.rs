//! Hierarchy resolution from flat person rows.
//!
//! # Responsibility
//! - Turn an unordered list of person rows into one rooted family tree.
//! - Report lenient fallbacks (discarded roots, shadowed names) as diagnostics.
//!
//! # Invariants
//! - Resolution is all-or-nothing: no partial tree on error.
//! - Same input in the same order yields structurally equal output.

mod hierarchy;

pub use hierarchy::{
    resolve, DiscardedRoot, HierarchyResolver, OrphanPolicy, Resolution, ResolutionDiagnostics,
    ResolveOptions, ShadowedName, ROOT_SENTINEL_ID,
};

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural defects in the input rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Row at `position` (0-based input index) has a blank id.
    MissingId { position: usize },
    /// Two or more rows share this id.
    DuplicateId { id: String },
    /// Row resolves to itself as its own parent.
    SelfParentReference { id: String },
    /// Rows whose parent chains loop back onto themselves, in input order.
    ParentCycle { ids: Vec<String> },
    /// No row is left without a resolvable parent.
    NoRootFound,
    /// More than one root candidate while orphans are rejected.
    MultipleRoots { ids: Vec<String> },
}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingId { position } => write!(f, "record at position {position} has no id"),
            Self::DuplicateId { id } => write!(f, "duplicate record id: {id}"),
            Self::SelfParentReference { id } => {
                write!(f, "record {id} names itself as its own parent")
            }
            Self::ParentCycle { ids } => {
                write!(f, "parent references form a cycle: {}", ids.join(", "))
            }
            Self::NoRootFound => write!(f, "no root record found"),
            Self::MultipleRoots { ids } => {
                write!(f, "multiple root records found: {}", ids.join(", "))
            }
        }
    }
}

impl Error for ResolutionError {}

impl ResolutionError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingId { .. } => "missing_id",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::SelfParentReference { .. } => "self_parent_reference",
            Self::ParentCycle { .. } => "parent_cycle",
            Self::NoRootFound => "no_root_found",
            Self::MultipleRoots { .. } => "multiple_roots",
        }
    }
}
