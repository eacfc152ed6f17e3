//! Driving port for creating tags, activities, and expenses.

use async_trait::async_trait;

use crate::domain::{Activity, Expense, LifelogError, NewActivity, NewExpense, NewTag, Tag};

/// Creation use-cases.
///
/// Each call validates its input, checks that every referenced entity
/// exists, and stores exactly one new record. Nothing is stored on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Adding: Send + Sync {
    /// Create a tag with a unique normalised name.
    async fn new_tag(&self, tag: NewTag) -> Result<Tag, LifelogError>;

    /// Create an activity linked to existing tags.
    async fn new_activity(&self, activity: NewActivity) -> Result<Activity, LifelogError>;

    /// Create an expense linked to existing tags and, optionally, an
    /// existing activity.
    async fn new_expense(&self, expense: NewExpense) -> Result<Expense, LifelogError>;
}
