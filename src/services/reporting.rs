//! Location reporting and deduplication service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::{GridService, OwnerLocks};
use crate::db::config::StoreConfig;
use crate::db::repository::{LocationRepository, RepositoryResult, UserDirectory};
use crate::models::{GeoPoint, ReportedLocation};

/// Converts raw (longitude, latitude) reports into canonical
/// [`ReportedLocation`] updates.
///
/// Repeat visits within the configured proximity radius accumulate on one
/// record instead of spawning near-duplicates; every accepted report is
/// propagated into the owner's frequency grid.
///
/// The read-then-write cycle (nearest lookup, then create-or-append)
/// serializes per owner, so two concurrent reports of the same new place
/// cannot both miss the lookup and create twin records.
#[derive(Clone)]
pub struct LocationService {
    locations: Arc<dyn LocationRepository>,
    users: Arc<dyn UserDirectory>,
    grids: GridService,
    config: StoreConfig,
    locks: OwnerLocks,
}

impl LocationService {
    /// Create a service with the default configuration.
    pub fn new(
        locations: Arc<dyn LocationRepository>,
        users: Arc<dyn UserDirectory>,
        grids: GridService,
    ) -> Self {
        Self::with_config(locations, users, grids, StoreConfig::default())
    }

    /// Create a service with an explicit configuration.
    pub fn with_config(
        locations: Arc<dyn LocationRepository>,
        users: Arc<dyn UserDirectory>,
        grids: GridService,
        config: StoreConfig,
    ) -> Self {
        Self {
            locations,
            users,
            grids,
            config,
            locks: OwnerLocks::new(),
        }
    }

    /// Check if the backing location store is healthy.
    pub async fn health_check(&self) -> RepositoryResult<bool> {
        self.locations.health_check().await
    }

    /// Record that `owner` is at the given coordinates right now.
    ///
    /// # Returns
    /// * `Ok(Some(ReportedLocation))` - The created or updated record
    /// * `Ok(None)` - `owner` is not a known user; nothing was recorded
    /// * `Err` if a store call fails
    pub async fn report(
        &self,
        owner: &str,
        longitude: f64,
        latitude: f64,
    ) -> RepositoryResult<Option<ReportedLocation>> {
        self.report_at(owner, longitude, latitude, Utc::now()).await
    }

    /// Record a report with an explicit timestamp, for backfilling
    /// history from imports.
    ///
    /// If a location of `owner` already lies within the proximity radius,
    /// the nearest one absorbs the report as a repeat; otherwise a new
    /// record is created, provided the owner exists. Either way the
    /// affected record is persisted and handed to the grid aggregator.
    ///
    /// # Arguments
    /// * `owner` - Username reporting the location
    /// * `longitude`, `latitude` - Raw coordinates, accepted as given
    /// * `at` - The report timestamp
    pub async fn report_at(
        &self,
        owner: &str,
        longitude: f64,
        latitude: f64,
        at: DateTime<Utc>,
    ) -> RepositoryResult<Option<ReportedLocation>> {
        let lock = self.locks.for_owner(owner);
        let _guard = lock.lock().await;

        let mut point = GeoPoint::new(longitude, latitude);
        if let Some(decimals) = self.config.round_decimals {
            point = point.rounded(decimals);
        }

        let nearest = self
            .locations
            .find_nearest(owner, point, self.config.proximity_m)
            .await?;

        let location = match nearest {
            Some(mut location) => {
                location.record_report(at);
                debug!(
                    "Repeat report for user {} at location {} ({} reports)",
                    owner,
                    location.id,
                    location.times_reported()
                );
                location
            }
            None => {
                if !self.users.exists(owner).await? {
                    warn!("Dropping location report for unknown user {}", owner);
                    return Ok(None);
                }
                let location = ReportedLocation::new(owner, point, at);
                info!(
                    "New location {} for user {} at ({}, {})",
                    location.id, owner, point.longitude, point.latitude
                );
                location
            }
        };

        self.locations.upsert(&location).await?;
        self.propagate_to_grid(&location).await?;
        Ok(Some(location))
    }

    /// Every location ever reported by `owner`, unfiltered by time.
    pub async fn history(&self, owner: &str) -> RepositoryResult<Vec<ReportedLocation>> {
        self.locations.find_all(owner).await
    }

    /// Hand an updated record to the frequency grid aggregator.
    async fn propagate_to_grid(&self, location: &ReportedLocation) -> RepositoryResult<()> {
        if let Some(mut grid) = self.grids.get(&location.owner).await? {
            self.grids.insert(&mut grid, location).await?;
        }
        Ok(())
    }
}
