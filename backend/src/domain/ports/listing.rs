//! Driving port for read-only queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Activity, ActivityId, Expense, ExpenseId, LifelogError, Tag, TagId};

/// Read-only queries.
///
/// Activity and expense lists come back newest first, with ties broken by
/// the higher id first. Tags come back ordered by name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Listing: Send + Sync {
    /// Activities starting at or after `since`, which must not be in the
    /// future.
    async fn activities_by_time(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<Activity>, LifelogError>;

    /// Expenses at or after `since`, which must not be in the future.
    async fn expenses_by_time(&self, since: DateTime<Utc>) -> Result<Vec<Expense>, LifelogError>;

    async fn all_tags(&self) -> Result<Vec<Tag>, LifelogError>;

    async fn activity(&self, id: ActivityId) -> Result<Activity, LifelogError>;

    async fn expense(&self, id: ExpenseId) -> Result<Expense, LifelogError>;

    async fn activities_by_tag(&self, id: TagId) -> Result<Vec<Activity>, LifelogError>;

    async fn expenses_by_tag(&self, id: TagId) -> Result<Vec<Expense>, LifelogError>;

    async fn expenses_by_activity(&self, id: ActivityId) -> Result<Vec<Expense>, LifelogError>;
}
