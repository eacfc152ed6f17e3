//! Port for activity persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Activity, ActivityId, NewActivity, Tag, TagId};

use super::RepositoryError;

/// Storage for activities and their tag links.
///
/// Returned activities carry their tags resolved to the current tag names.
/// List operations make no ordering promise; the listing service sorts.
///
/// Writes linking a tag that no longer exists fail with
/// [`RepositoryError::MissingReference`]. Deleting an activity that an
/// expense still links to fails with [`RepositoryError::StillReferenced`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn find_by_id(&self, id: ActivityId) -> Result<Option<Activity>, RepositoryError>;

    /// Activities whose start time is at or after `since`.
    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Activity>, RepositoryError>;

    async fn list_by_tag(&self, tag_id: TagId) -> Result<Vec<Activity>, RepositoryError>;

    /// Whether any activity references the tag.
    async fn has_tag(&self, tag_id: TagId) -> Result<bool, RepositoryError>;

    /// Persist a validated activity linked to already resolved `tags`.
    async fn insert(
        &self,
        activity: &NewActivity,
        tags: &[Tag],
    ) -> Result<Activity, RepositoryError>;

    /// Replace every field and tag link of the stored activity.
    async fn update(&self, activity: &Activity) -> Result<(), RepositoryError>;

    async fn delete(&self, id: ActivityId) -> Result<(), RepositoryError>;
}
