//! Reported location model.
//!
//! A [`ReportedLocation`] is one canonical geographic point for one user,
//! carrying the append-only list of timestamps at which that point was
//! reported. Repeat visits within [`POINT_ACCURACY_M`] meters accumulate
//! on a single record instead of spawning near-duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distance (in meters) within which two reports count as the same place.
pub const POINT_ACCURACY_M: f64 = 10.0;

/// Unique identifier of a [`ReportedLocation`].
///
/// Generated client-side so records can be written with upsert-by-key
/// semantics; immutable once assigned.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LocationId(pub Uuid);

impl LocationId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        LocationId(Uuid::new_v4())
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A WGS84 coordinate pair, longitude first.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Round both coordinates to `decimals` decimal places.
    ///
    /// Four decimal places keeps a point within roughly 11 meters of the
    /// raw fix, which coarsens fixes enough to stop GPS jitter from
    /// scattering reports of one physical place.
    pub fn rounded(&self, decimals: u32) -> Self {
        let factor = 10f64.powi(decimals as i32);
        Self {
            longitude: (self.longitude * factor).round() / factor,
            latitude: (self.latitude * factor).round() / factor,
        }
    }

    /// Convert to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        p.to_point()
    }
}

/// A canonical reported location for one user.
///
/// Created on the first report at a new place; every later report within
/// the proximity threshold appends to `reported`. Records are never
/// deleted. For a given owner, any two records are farther apart than
/// [`POINT_ACCURACY_M`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportedLocation {
    /// Opaque unique identifier, assigned at creation.
    pub id: LocationId,
    /// Username of the user this point belongs to.
    pub owner: String,
    /// The geographic point.
    pub point: GeoPoint,
    /// Every moment this point was reported, in chronological order.
    /// Holds at least one entry after creation.
    pub reported: Vec<DateTime<Utc>>,
    /// Creation timestamp, immutable.
    pub created: DateTime<Utc>,
}

impl ReportedLocation {
    /// Create a new record with a single initial report timestamp.
    pub fn new(owner: impl Into<String>, point: GeoPoint, at: DateTime<Utc>) -> Self {
        Self {
            id: LocationId::new(),
            owner: owner.into(),
            point,
            reported: vec![at],
            created: at,
        }
    }

    /// Append a repeat-report timestamp.
    pub fn record_report(&mut self, at: DateTime<Utc>) {
        self.reported.push(at);
    }

    /// The most recent report timestamp.
    pub fn last_reported(&self) -> DateTime<Utc> {
        self.reported.last().copied().unwrap_or(self.created)
    }

    /// How many times this location has been reported.
    pub fn times_reported(&self) -> usize {
        self.reported.len()
    }
}
