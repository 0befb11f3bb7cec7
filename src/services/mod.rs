//! Service layer for business logic and orchestration.
//!
//! Services sit between callers (an HTTP layer, jobs) and the repository
//! traits. Each service receives its store handles through its
//! constructor and is cheap to clone; clones share state.
//!
//! Write paths serialize per owner: a read-then-write report cycle that
//! raced another report for the same owner could observe no nearby match
//! twice and create near-duplicate records, so both reporting and grid
//! insertion take a per-owner async lock for the duration of the cycle.
//! Route building is read-only and takes no lock.

pub mod grid;
pub mod reporting;
pub mod route;

pub use grid::GridService;
pub use reporting::LocationService;
pub use route::RouteService;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Lazily allocated per-owner async locks.
#[derive(Clone, Default)]
pub(crate) struct OwnerLocks {
    inner: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl OwnerLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The lock guarding write cycles for `owner`.
    pub(crate) fn for_owner(&self, owner: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.inner.lock().unwrap();
        locks.entry(owner.to_string()).or_default().clone()
    }
}
