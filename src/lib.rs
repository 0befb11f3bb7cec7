//! # Whereabouts
//!
//! Location history tracking core: proximity-deduplicated location
//! reports, per-user weekday/hour frequency grids, and timed route
//! reconstruction.
//!
//! ## What it does
//!
//! - **Report deduplication**: raw (longitude, latitude) reports within
//!   10 meters of an already-known point for the same user accumulate on
//!   one [`models::ReportedLocation`] record instead of creating
//!   near-duplicates.
//! - **Frequency grids**: every accepted report lands in the owner's
//!   7x24 [`models::FrequencyGrid`], keyed by ISO weekday and hour of
//!   day, with per-slot dedup and most-visited-first ordering.
//! - **Timed routes**: the full report history flattens into an ordered,
//!   adjacent-deduplicated [`models::TimedRoute`] for an optional
//!   half-open time window, renderable as a GeoJSON LineString.
//!
//! ## Architecture
//!
//! The crate is organized into three logical layers:
//!
//! - [`models`]: Domain types (locations, grids, routes)
//! - [`db`]: Repository traits, error types, and the in-memory store
//! - [`services`]: Business logic wired together by constructor injection
//!
//! HTTP routing, authentication, account management, and push delivery
//! are collaborators outside this crate; callers authenticate users and
//! map requests onto the service operations.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use whereabouts::db::repositories::LocalStore;
//! use whereabouts::services::{GridService, LocationService, RouteService};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), whereabouts::db::RepositoryError> {
//! let store = Arc::new(LocalStore::new());
//! store.add_user("alice");
//!
//! let grids = GridService::new(store.clone(), store.clone(), store.clone());
//! let reports = LocationService::new(store.clone(), store.clone(), grids);
//! let routes = RouteService::new(store.clone());
//!
//! let location = reports.report("alice", -79.38, 43.65).await?.unwrap();
//! assert_eq!(location.times_reported(), 1);
//!
//! let route = routes.build("alice", None, None).await?;
//! assert_eq!(route.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod geo_utils;
pub mod models;
pub mod services;

pub use db::{RepositoryError, RepositoryResult};
pub use models::{
    FrequencyGrid, GeoPoint, LocationId, ReportedLocation, TimedRoute, POINT_ACCURACY_M,
};
pub use services::{GridService, LocationService, RouteService};
