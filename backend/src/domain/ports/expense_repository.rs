//! Port for expense persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ActivityId, Expense, ExpenseId, NewExpense, Tag, TagId};

use super::RepositoryError;

/// Storage for expenses and their tag links.
///
/// Writes linking a tag or activity that no longer exists fail with
/// [`RepositoryError::MissingReference`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, RepositoryError>;

    /// Expenses whose time is at or after `since`.
    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Expense>, RepositoryError>;

    async fn list_by_tag(&self, tag_id: TagId) -> Result<Vec<Expense>, RepositoryError>;

    async fn list_by_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<Expense>, RepositoryError>;

    /// Whether any expense references the tag.
    async fn has_tag(&self, tag_id: TagId) -> Result<bool, RepositoryError>;

    /// Whether any expense references the activity.
    async fn has_activity(&self, activity_id: ActivityId) -> Result<bool, RepositoryError>;

    /// Persist a validated expense linked to already resolved `tags`.
    async fn insert(&self, expense: &NewExpense, tags: &[Tag])
    -> Result<Expense, RepositoryError>;

    async fn update(&self, expense: &Expense) -> Result<(), RepositoryError>;

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError>;

    /// Remove every expense referencing the activity and report how many
    /// were removed.
    async fn delete_by_activity(&self, activity_id: ActivityId) -> Result<u64, RepositoryError>;
}
