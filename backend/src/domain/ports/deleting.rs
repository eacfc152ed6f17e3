//! Driving port for guarded deletes.

use async_trait::async_trait;

use crate::domain::{ActivityId, ExpenseId, LifelogError, TagId};

/// Deletes that refuse to orphan references. All checks run before any
/// mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Deleting: Send + Sync {
    /// Delete a tag that no expense or activity references.
    async fn tag(&self, id: TagId) -> Result<(), LifelogError>;

    /// Delete an activity that no expense references.
    async fn activity(&self, id: ActivityId) -> Result<(), LifelogError>;

    async fn expense(&self, id: ExpenseId) -> Result<(), LifelogError>;

    /// Delete every expense of an activity, returning how many went.
    async fn activity_expenses(&self, id: ActivityId) -> Result<u64, LifelogError>;
}
