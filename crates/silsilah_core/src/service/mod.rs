//! Use-case services consumed by renderers.
//!
//! # Responsibility
//! - Acquire rows with fixture fallback and resolve them into a tree.
//! - Publish the current tree atomically and hold renderer view state.
//! - Project persons into detail views.

pub mod app_state;
pub mod detail;
pub mod loader;
pub mod store;
