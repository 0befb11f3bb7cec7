//! Frequency grid aggregation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::{ConvexHull, MultiPoint, Point, Polygon};
use log::{debug, info};

use super::OwnerLocks;
use crate::db::repository::{
    GridRepository, LocationRepository, RepositoryResult, UserDirectory,
};
use crate::models::grid::slot_of;
use crate::models::{FrequencyGrid, HourBucket, LocationId, ReportedLocation};

/// Maintains the per-user 7x24 popularity structure so "where does this
/// user usually go, and when" can be answered without re-scanning raw
/// history.
///
/// Insertions serialize per owner to keep the popularity re-sort free of
/// lost updates when two reports land at once.
#[derive(Clone)]
pub struct GridService {
    grids: Arc<dyn GridRepository>,
    users: Arc<dyn UserDirectory>,
    locations: Arc<dyn LocationRepository>,
    locks: OwnerLocks,
}

impl GridService {
    /// Create a service over the given store handles.
    pub fn new(
        grids: Arc<dyn GridRepository>,
        users: Arc<dyn UserDirectory>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            grids,
            users,
            locations,
            locks: OwnerLocks::new(),
        }
    }

    /// Fetch the grid for `owner`, lazily creating an empty one for a
    /// valid user.
    ///
    /// # Returns
    /// * `Ok(Some(FrequencyGrid))` - The existing or newly created grid
    /// * `Ok(None)` - `owner` is not a known user
    /// * `Err` if a store call fails
    pub async fn get(&self, owner: &str) -> RepositoryResult<Option<FrequencyGrid>> {
        if let Some(grid) = self.grids.find_by_owner(owner).await? {
            return Ok(Some(grid));
        }

        if !self.users.exists(owner).await? {
            return Ok(None);
        }

        info!("Creating frequency grid for user {}", owner);
        let grid = FrequencyGrid::new(owner);
        self.grids.upsert(&grid).await?;
        Ok(Some(grid))
    }

    /// Record `location`'s most recent report in the grid and persist it.
    ///
    /// The timestamp's ISO weekday and hour select the bucket; a repeat of
    /// the same (location, calendar hour) leaves the bucket untouched but
    /// the grid is persisted either way.
    ///
    /// # Arguments
    /// * `grid` - The grid to update, mutated in place
    /// * `location` - The location whose last report to record
    pub async fn insert(
        &self,
        grid: &mut FrequencyGrid,
        location: &ReportedLocation,
    ) -> RepositoryResult<()> {
        let lock = self.locks.for_owner(&grid.owner);
        let _guard = lock.lock().await;

        let at = location.last_reported();
        if grid.insert(location.id, at) {
            debug!(
                "Recorded location {} for user {} at slot {:?}",
                location.id,
                grid.owner,
                slot_of(at)
            );
        } else {
            debug!(
                "Location {} already recorded for user {} in this calendar hour",
                location.id, grid.owner
            );
        }

        self.grids.upsert(grid).await
    }

    /// The locations reported during one weekday/hour slot, popularity
    /// ordered, or `None` when the user is unknown or the slot is empty.
    ///
    /// # Arguments
    /// * `owner` - Username
    /// * `weekday` - ISO weekday, 1 = Monday .. 7 = Sunday
    /// * `hour` - Hour of day, 0..=23
    pub async fn locations_reported_at(
        &self,
        owner: &str,
        weekday: u8,
        hour: u8,
    ) -> RepositoryResult<Option<HourBucket>> {
        let grid = self.get(owner).await?;
        Ok(grid.and_then(|g| g.locations_reported_at(weekday, hour).cloned()))
    }

    /// Convex hull of the user's habitual locations around the time `at`.
    ///
    /// Takes the most frequently reported locations from the grid cell of
    /// `at` and the following hour (wrapping day boundaries), capped at
    /// `limit` distinct points, and hulls them into the region the user is
    /// likely to visit next.
    ///
    /// # Returns
    /// * `Ok(Some(Polygon))` - The hull
    /// * `Ok(None)` - Unknown user, or fewer than three distinct points
    /// * `Err` if a store call fails
    pub async fn likely_region(
        &self,
        owner: &str,
        at: DateTime<Utc>,
        limit: usize,
    ) -> RepositoryResult<Option<Polygon<f64>>> {
        let Some(grid) = self.get(owner).await? else {
            return Ok(None);
        };

        // Candidates from both cells, ranked by how often they were
        // reported there; a place visited in both hours counts once with
        // its reports combined.
        let slot = slot_of(at);
        let mut candidates: Vec<(LocationId, usize)> = Vec::new();
        for (weekday, hour) in [slot, next_slot(slot)] {
            if let Some(bucket) = grid.locations_reported_at(weekday, hour) {
                for entry in &bucket.entries {
                    match candidates.iter_mut().find(|(id, _)| *id == entry.location) {
                        Some((_, count)) => *count += entry.reported.len(),
                        None => candidates.push((entry.location, entry.reported.len())),
                    }
                }
            }
        }
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let ids: Vec<LocationId> = candidates
            .into_iter()
            .take(limit)
            .map(|(id, _)| id)
            .collect();

        let history = self.locations.find_all(owner).await?;
        let points: Vec<Point<f64>> = ids
            .iter()
            .filter_map(|id| history.iter().find(|l| l.id == *id))
            .map(|l| l.point.to_point())
            .collect();

        if points.len() < 3 {
            return Ok(None);
        }

        Ok(Some(MultiPoint::from(points).convex_hull()))
    }
}

/// The weekday/hour cell immediately after the given one, wrapping both
/// the day and the week at midnight.
fn next_slot((weekday, hour): (u8, u8)) -> (u8, u8) {
    if hour == 23 {
        (weekday % 7 + 1, 0)
    } else {
        (weekday, hour + 1)
    }
}
