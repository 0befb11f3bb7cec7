//! Repository trait definitions for storage operations.
//!
//! This module provides a collection of focused traits that abstract the
//! persistence collaborators. Splitting responsibilities across traits
//! keeps implementations focused and lets tests substitute any collaborator
//! independently.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`location`]: Reported-location storage with the proximity lookup
//! - [`grid`]: Frequency-grid storage keyed by owner
//! - [`users`]: User directory existence checks

pub mod error;
pub mod grid;
pub mod location;
pub mod users;

pub use error::{RepositoryError, RepositoryResult};
pub use grid::GridRepository;
pub use location::LocationRepository;
pub use users::UserDirectory;
