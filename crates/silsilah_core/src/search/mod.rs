//! Member search over a resolved tree.
//!
//! # Responsibility
//! - Locate persons by partial name for highlight and detail views.
//!
//! # Invariants
//! - Matching is case-insensitive substring on the trimmed query.
//! - Results follow breadth-first order, so shallower generations win.

pub mod member;
