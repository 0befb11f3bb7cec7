//! User directory collaborator interface.

use async_trait::async_trait;

use super::error::RepositoryResult;

/// Existence checks against the user directory.
///
/// Account management lives elsewhere; this core only ever needs to know
/// whether an owner is a real user before creating records on their
/// behalf.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether `owner` is a known user.
    async fn exists(&self, owner: &str) -> RepositoryResult<bool>;
}
