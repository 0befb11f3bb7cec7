//! Timed route reconstruction service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;

use crate::db::repository::{LocationRepository, RepositoryResult};
use crate::models::TimedRoute;

/// Rebuilds a readable path of where a user has been, optionally bounded
/// in time.
///
/// Purely read-only: no locks are taken, and a route built concurrently
/// with a write may observe a mid-write snapshot of the history. Routes
/// are advisory, not transactional.
#[derive(Clone)]
pub struct RouteService {
    locations: Arc<dyn LocationRepository>,
}

impl RouteService {
    /// Create a service over the given location store handle.
    pub fn new(locations: Arc<dyn LocationRepository>) -> Self {
        Self { locations }
    }

    /// Build the route for `owner` within the half-open [start, end)
    /// window; either bound may be omitted.
    ///
    /// An owner with no history (including an unknown owner) yields an
    /// empty route, not an error. A reversed window is not rejected and
    /// simply produces an empty route.
    pub async fn build(
        &self,
        owner: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> RepositoryResult<TimedRoute> {
        let history = self.locations.find_all(owner).await?;
        let route = TimedRoute::from_history(history, start, end);

        debug!(
            "Built route for user {} with {} points (start={:?}, end={:?})",
            owner,
            route.len(),
            start,
            end
        );
        Ok(route)
    }
}
