//! Family tree domain model.
//!
//! # Responsibility
//! - Define flat person rows as delivered by data sources.
//! - Define the resolved, single-rooted tree consumed by renderers.
//!
//! # Invariants
//! - Absent values are `None`, never blank strings or the `-` sentinel.
//! - Tree nodes are built once per resolution pass and never mutated.

pub mod person;
pub mod tree;
