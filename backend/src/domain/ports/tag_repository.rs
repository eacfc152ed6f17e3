//! Port for tag persistence.

use async_trait::async_trait;

use crate::domain::{NewTag, Tag, TagId};

use super::RepositoryError;

/// Storage for tags.
///
/// Adapters assign ids on insert and never reuse them. Callers validate and
/// normalise names before they reach the repository, so `find_by_name`
/// compares names exactly.
///
/// Adapters enforce name uniqueness on `insert` and `update`
/// ([`RepositoryError::Duplicate`]) and refuse to delete a tag that an
/// activity or expense still links to ([`RepositoryError::StillReferenced`]).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Fetch a tag by id.
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, RepositoryError>;

    /// Fetch a tag by its normalised name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError>;

    /// Every stored tag, in no particular order.
    async fn list(&self) -> Result<Vec<Tag>, RepositoryError>;

    /// Persist a new tag and return it with its assigned id.
    async fn insert(&self, tag: &NewTag) -> Result<Tag, RepositoryError>;

    /// Replace the stored tag with the same id.
    async fn update(&self, tag: &Tag) -> Result<(), RepositoryError>;

    /// Remove an unlinked tag. Removing an absent id is not an error.
    async fn delete(&self, id: TagId) -> Result<(), RepositoryError>;
}
