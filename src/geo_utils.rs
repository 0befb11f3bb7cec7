//! Geographic utilities.
//!
//! Distance and degree-conversion helpers shared by the proximity lookup.
//! All coordinates are WGS84 longitude/latitude in degrees.

use geo::{Distance, Haversine};

use crate::models::GeoPoint;

/// Meters per degree of latitude (and of longitude at the equator).
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Great-circle distance between two points in meters, by the Haversine
/// formula (spherical Earth, radius 6371 km).
#[inline]
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Haversine::distance(a.to_point(), b.to_point())
}

/// Approximate degrees of latitude spanning `meters`.
#[inline]
pub fn meters_to_lat_degrees(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE
}

/// Approximate degrees of longitude spanning `meters` at `latitude`.
///
/// Meridians converge toward the poles, so the same distance covers more
/// degrees of longitude the farther from the equator. Clamped near the
/// poles where the conversion blows up.
#[inline]
pub fn meters_to_lng_degrees(meters: f64, latitude: f64) -> f64 {
    let scale = latitude.to_radians().cos().max(0.01);
    meters / (METERS_PER_DEGREE * scale)
}
