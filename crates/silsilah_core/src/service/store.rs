//! Current-tree holder with "latest request wins" publishing.
//!
//! # Invariants
//! - Tickets are strictly increasing per store.
//! - A snapshot is only visible if its ticket is newer than the visible one
//!   and no newer refresh has started.
//! - Readers see either the old or the new snapshot, never a mix.
//! - Once a source-backed snapshot is visible, fixture rows never replace it.

use crate::service::loader::{LoadError, LoadedTree, TreeLoader};
use arc_swap::ArcSwapOption;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of one refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Published tree together with the request that produced it.
#[derive(Debug)]
pub struct TreeSnapshot {
    pub ticket: RefreshTicket,
    pub loaded: LoadedTree,
}

/// Result of a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published(RefreshTicket),
    /// A newer refresh superseded this one; its result was dropped.
    Stale {
        ticket: RefreshTicket,
        latest: RefreshTicket,
    },
}

/// Holds the tree currently shown by the renderer.
#[derive(Debug, Default)]
pub struct TreeStore {
    current: ArcSwapOption<TreeSnapshot>,
    latest_ticket: AtomicU64,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh; older in-flight refreshes become stale.
    pub fn begin_refresh(&self) -> RefreshTicket {
        RefreshTicket(self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn latest_ticket(&self) -> RefreshTicket {
        RefreshTicket(self.latest_ticket.load(Ordering::SeqCst))
    }

    pub fn is_latest(&self, ticket: RefreshTicket) -> bool {
        self.latest_ticket() == ticket
    }

    /// Swaps in `loaded` if `ticket` is still the latest request.
    pub fn publish(&self, ticket: RefreshTicket, loaded: LoadedTree) -> PublishOutcome {
        let latest = self.latest_ticket();
        if ticket != latest {
            debug!(
                "event=publish module=service status=stale ticket={} latest={}",
                ticket.0, latest.0
            );
            return PublishOutcome::Stale { ticket, latest };
        }

        let snapshot = Arc::new(TreeSnapshot { ticket, loaded });
        let mut stored = false;
        self.current.rcu(|current| match current {
            Some(existing) if existing.ticket >= ticket => {
                stored = false;
                Some(Arc::clone(existing))
            }
            _ => {
                stored = true;
                Some(Arc::clone(&snapshot))
            }
        });

        if stored {
            info!(
                "event=publish module=service status=ok ticket={} reachable={}",
                ticket.0,
                snapshot.loaded.resolution.tree.len()
            );
            PublishOutcome::Published(ticket)
        } else {
            PublishOutcome::Stale {
                ticket,
                latest: self.latest_ticket(),
            }
        }
    }

    /// Currently visible snapshot, if any refresh has been published.
    pub fn current(&self) -> Option<Arc<TreeSnapshot>> {
        self.current.load_full()
    }

    /// Runs one full refresh through `loader` and publishes the result.
    ///
    /// The fixture fallback only applies until a source-backed snapshot is
    /// visible; after that a failed fetch leaves the current snapshot alone.
    ///
    /// # Errors
    /// - Returns `LoadError` from the latest request. Errors of superseded
    ///   requests are dropped like their trees.
    pub async fn refresh(&self, loader: &TreeLoader) -> Result<PublishOutcome, LoadError> {
        let ticket = self.begin_refresh();
        let has_source_tree = self
            .current()
            .is_some_and(|snapshot| !snapshot.loaded.origin.is_fallback());
        let result = if has_source_tree {
            loader.load_without_fallback().await
        } else {
            loader.load().await.map_err(LoadError::from)
        };
        if !self.is_latest(ticket) {
            let latest = self.latest_ticket();
            debug!(
                "event=publish module=service status=stale ticket={} latest={}",
                ticket.0, latest.0
            );
            return Ok(PublishOutcome::Stale { ticket, latest });
        }
        match result {
            Ok(loaded) => Ok(self.publish(ticket, loaded)),
            Err(err) => {
                warn!(
                    "event=refresh module=service status=kept ticket={} error={}",
                    ticket.0, err
                );
                Err(err)
            }
        }
    }
}
