//! Timed route view over a user's report history.

use chrono::{DateTime, Utc};
use geo::{Coord, LineString};
use serde::{Deserialize, Serialize};

use super::location::ReportedLocation;

/// One stop on a route: a location and the moment it was reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub at: DateTime<Utc>,
    pub location: ReportedLocation,
}

/// A chronologically ordered, adjacent-deduplicated sequence of reported
/// locations, built on demand for one owner and an optional half-open
/// [start, end) window.
///
/// Derived from the report history, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimedRoute {
    pub points: Vec<RoutePoint>,
}

impl TimedRoute {
    /// Build a route from an owner's full report history.
    ///
    /// Every (timestamp, location) pair across all `reported` lists is
    /// flattened, filtered against the window, sorted ascending by
    /// timestamp (equal timestamps keep flattening order), and collapsed
    /// so that immediately consecutive repeats of one location appear
    /// once. Later, non-adjacent returns to the same place are preserved.
    pub fn from_history(
        history: Vec<ReportedLocation>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        let mut visits: Vec<(DateTime<Utc>, &ReportedLocation)> = history
            .iter()
            .flat_map(|location| {
                location
                    .reported
                    .iter()
                    .copied()
                    .filter(|at| in_window(*at, start, end))
                    .map(move |at| (at, location))
            })
            .collect();

        visits.sort_by_key(|(at, _)| *at);

        let mut points: Vec<RoutePoint> = Vec::with_capacity(visits.len());
        for (at, location) in visits {
            if points.last().map(|p| p.location.id) == Some(location.id) {
                continue;
            }
            points.push(RoutePoint {
                at,
                location: location.clone(),
            });
        }

        Self { points }
    }

    /// The route as a line geometry, coordinates in visiting order.
    pub fn line_string(&self) -> LineString<f64> {
        LineString::from(
            self.points
                .iter()
                .map(|p| Coord {
                    x: p.location.point.longitude,
                    y: p.location.point.latitude,
                })
                .collect::<Vec<_>>(),
        )
    }

    /// The route as a GeoJSON LineString geometry.
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.line_string()))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Half-open window check: start is inclusive, end exclusive, either side
/// optional.
fn in_window(at: DateTime<Utc>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
    match (start, end) {
        (None, None) => true,
        (Some(start), None) => at >= start,
        (None, Some(end)) => at < end,
        (Some(start), Some(end)) => at >= start && at < end,
    }
}
