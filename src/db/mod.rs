//! Storage module for location data.
//!
//! This module provides abstractions for persistence via the repository
//! pattern, allowing different storage backends to be swapped without
//! touching the services.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP handlers, jobs, etc.)          │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - Business Logic             │
//! │  - Proximity dedup of incoming reports                  │
//! │  - Frequency-grid insertion and ordering                │
//! │  - Timed-route reconstruction                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! │  - LocationRepository (points + proximity lookup)       │
//! │  - GridRepository (grids keyed by owner)                │
//! │  - UserDirectory (existence checks)                     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!         ┌───────────▼────────────┐
//!         │  Local Store           │
//!         │  (in-memory, R-tree)   │
//!         └────────────────────────┘
//! ```
//!
//! Store handles are passed into each service's constructor; there is no
//! process-wide repository singleton.

pub mod config;
pub mod repositories;
pub mod repository;

pub use config::StoreConfig;
pub use repositories::LocalStore;
pub use repository::{
    GridRepository, LocationRepository, RepositoryError, RepositoryResult, UserDirectory,
};
