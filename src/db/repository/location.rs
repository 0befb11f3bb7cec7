//! Repository trait for reported-location storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{GeoPoint, ReportedLocation};

/// Storage interface for [`ReportedLocation`] records.
///
/// The proximity lookup is a capability of the store: production backends
/// are expected to answer it with a geospatial index (a 2dsphere `$near`
/// query, PostGIS, an R-tree), and the in-memory implementation keeps a
/// per-owner R-tree of its own.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so handles can be shared across
/// tasks behind an `Arc`.
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Check if the backing store is reachable and healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Find the single nearest location of `owner` within `radius_m`
    /// meters of `point`.
    ///
    /// When several candidates lie within the radius, only the nearest is
    /// returned; the rest are discarded.
    ///
    /// # Arguments
    /// * `owner` - Username whose locations to search
    /// * `point` - Query coordinate
    /// * `radius_m` - Search radius in meters
    ///
    /// # Returns
    /// * `Ok(Some(ReportedLocation))` - The nearest match within the radius
    /// * `Ok(None)` - No location of `owner` lies within the radius
    /// * `Err(RepositoryError)` - If the query fails
    async fn find_nearest(
        &self,
        owner: &str,
        point: GeoPoint,
        radius_m: f64,
    ) -> RepositoryResult<Option<ReportedLocation>>;

    /// Create or fully replace a record, keyed by its id.
    ///
    /// # Arguments
    /// * `location` - The record to write
    ///
    /// # Returns
    /// * `Ok(())` - The record was persisted
    /// * `Err(RepositoryError)` - If the write fails
    async fn upsert(&self, location: &ReportedLocation) -> RepositoryResult<()>;

    /// Every location ever reported by `owner`, unfiltered.
    ///
    /// Time filtering is deliberately not a storage concern; the route
    /// builder windows the flattened history itself.
    ///
    /// # Returns
    /// * `Ok(Vec<ReportedLocation>)` - All records for the owner (possibly empty)
    /// * `Err(RepositoryError)` - If the query fails
    async fn find_all(&self, owner: &str) -> RepositoryResult<Vec<ReportedLocation>>;
}
