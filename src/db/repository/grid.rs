//! Repository trait for frequency-grid storage.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::FrequencyGrid;

/// Storage interface for [`FrequencyGrid`] documents, keyed by owner.
#[async_trait]
pub trait GridRepository: Send + Sync {
    /// Check if the backing store is reachable and healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch the grid belonging to `owner`.
    ///
    /// # Returns
    /// * `Ok(Some(FrequencyGrid))` - The owner's grid
    /// * `Ok(None)` - No grid was ever persisted for this owner
    /// * `Err(RepositoryError)` - If the query fails
    async fn find_by_owner(&self, owner: &str) -> RepositoryResult<Option<FrequencyGrid>>;

    /// Create or fully replace the grid for its owner.
    ///
    /// # Returns
    /// * `Ok(())` - The grid was persisted
    /// * `Err(RepositoryError)` - If the write fails
    async fn upsert(&self, grid: &FrequencyGrid) -> RepositoryResult<()>;
}
