//! In-memory local store implementation.
//!
//! Implements every repository trait over plain in-memory structures,
//! suitable for unit testing and local development. Data lives behind a
//! single `RwLock`; proximity queries are answered from a per-owner R-tree
//! that is updated as locations are created.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rstar::{RTree, RTreeObject, AABB};

use crate::db::repository::{
    GridRepository, LocationRepository, RepositoryError, RepositoryResult, UserDirectory,
};
use crate::geo_utils;
use crate::models::{FrequencyGrid, GeoPoint, LocationId, ReportedLocation};

/// Envelope padding so a radius query in degrees never clips a point that
/// haversine distance would still accept.
const ENVELOPE_MARGIN: f64 = 1.25;

/// Location reference stored in the per-owner R-tree.
#[derive(Debug, Clone)]
struct IndexedPoint {
    id: LocationId,
    position: [f64; 2],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

struct LocalData {
    locations: HashMap<LocationId, ReportedLocation>,
    trees: HashMap<String, RTree<IndexedPoint>>,
    grids: HashMap<String, FrequencyGrid>,
    users: HashSet<String>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            locations: HashMap::new(),
            trees: HashMap::new(),
            grids: HashMap::new(),
            users: HashSet::new(),
            is_healthy: true,
        }
    }
}

/// In-memory store implementing all repository traits.
///
/// Clones share the same underlying data, so one instance can serve as
/// the location store, the grid store, and the user directory at once.
///
/// # Example
/// ```
/// use whereabouts::db::repositories::LocalStore;
///
/// let store = LocalStore::new();
/// store.add_user("alice");
/// assert_eq!(store.location_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct LocalStore {
    data: Arc<RwLock<LocalData>>,
}

impl LocalStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Register a user in the directory.
    pub fn add_user(&self, owner: &str) {
        let mut data = self.data.write().unwrap();
        data.users.insert(owner.to_string());
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write().unwrap();
        data.is_healthy = healthy;
    }

    /// Clear all data, keeping the health status.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of stored locations across all owners.
    pub fn location_count(&self) -> usize {
        self.data.read().unwrap().locations.len()
    }

    /// Number of persisted grids.
    pub fn grid_count(&self) -> usize {
        self.data.read().unwrap().grids.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read().unwrap();
        if !data.is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Store is not healthy".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for LocalStore {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn find_nearest(
        &self,
        owner: &str,
        point: GeoPoint,
        radius_m: f64,
    ) -> RepositoryResult<Option<ReportedLocation>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let Some(tree) = data.trees.get(owner) else {
            return Ok(None);
        };

        let dlat = geo_utils::meters_to_lat_degrees(radius_m) * ENVELOPE_MARGIN;
        let dlng = geo_utils::meters_to_lng_degrees(radius_m, point.latitude) * ENVELOPE_MARGIN;
        let envelope = AABB::from_corners(
            [point.longitude - dlng, point.latitude - dlat],
            [point.longitude + dlng, point.latitude + dlat],
        );

        let nearest = tree
            .locate_in_envelope_intersecting(&envelope)
            .filter_map(|candidate| {
                let location = data.locations.get(&candidate.id)?;
                let distance = geo_utils::haversine_distance(&point, &location.point);
                (distance <= radius_m).then_some((location, distance))
            })
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(nearest.map(|(location, _)| location.clone()))
    }

    async fn upsert(&self, location: &ReportedLocation) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();

        // Points are immutable once created, so the index entry only needs
        // to be written the first time an id shows up.
        if data.locations.insert(location.id, location.clone()).is_none() {
            data.trees
                .entry(location.owner.clone())
                .or_insert_with(RTree::new)
                .insert(IndexedPoint {
                    id: location.id,
                    position: [location.point.longitude, location.point.latitude],
                });
        }

        Ok(())
    }

    async fn find_all(&self, owner: &str) -> RepositoryResult<Vec<ReportedLocation>> {
        self.check_health()?;
        let data = self.data.read().unwrap();

        let mut locations: Vec<ReportedLocation> = data
            .locations
            .values()
            .filter(|location| location.owner == owner)
            .cloned()
            .collect();

        locations.sort_by_key(|location| location.created);
        Ok(locations)
    }
}

#[async_trait]
impl GridRepository for LocalStore {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read().unwrap();
        Ok(data.is_healthy)
    }

    async fn find_by_owner(&self, owner: &str) -> RepositoryResult<Option<FrequencyGrid>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data.grids.get(owner).cloned())
    }

    async fn upsert(&self, grid: &FrequencyGrid) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.grids.insert(grid.owner.clone(), grid.clone());
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for LocalStore {
    async fn exists(&self, owner: &str) -> RepositoryResult<bool> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data.users.contains(owner))
    }
}
