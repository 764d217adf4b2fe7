//! Renderer-owned application state.
//!
//! # Responsibility
//! - Hold the current tree and view flags as one explicit value.
//! - Translate search and selection requests into detail projections.
//!
//! # Invariants
//! - `highlighted` and `selected` hold ids only; they are looked up against
//!   the current tree on every read, so a refresh never leaves dangling nodes.

use crate::search::member::search_member;
use crate::service::detail::PersonDetail;
use crate::service::store::TreeStore;

/// Explicit view state of one renderer.
#[derive(Debug, Default)]
pub struct AppState {
    store: TreeStore,
    show_spouses: bool,
    highlighted: Option<String>,
    selected: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn show_spouses(&self) -> bool {
        self.show_spouses
    }

    /// Flips spouse display and returns the new value.
    pub fn toggle_spouses(&mut self) -> bool {
        self.show_spouses = !self.show_spouses;
        self.show_spouses
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Highlights and selects the first search match.
    ///
    /// Returns `None` and clears the highlight when nothing matches.
    pub fn highlight_search(&mut self, query: &str) -> Option<PersonDetail> {
        let snapshot = self.store.current();
        let found = snapshot.as_ref().and_then(|snapshot| {
            search_member(&snapshot.loaded.resolution.tree, query).map(PersonDetail::from_node)
        });
        self.highlighted = found.as_ref().map(|detail| detail.id.clone());
        if let Some(detail) = &found {
            self.selected = Some(detail.id.clone());
        }
        found
    }

    /// Selects the person with `id` for the detail view.
    pub fn select(&mut self, id: &str) -> Option<PersonDetail> {
        let detail = self.detail_of(id)?;
        self.selected = Some(detail.id.clone());
        Some(detail)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Detail of the selected person, if still present in the current tree.
    pub fn selected_detail(&self) -> Option<PersonDetail> {
        self.selected.as_deref().and_then(|id| self.detail_of(id))
    }

    fn detail_of(&self, id: &str) -> Option<PersonDetail> {
        let snapshot = self.store.current()?;
        snapshot
            .loaded
            .resolution
            .tree
            .find(id)
            .map(PersonDetail::from_node)
    }
}
