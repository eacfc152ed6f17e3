//! Driving port for replacing stored entities.

use async_trait::async_trait;

use crate::domain::{
    Activity, ActivityId, Expense, ExpenseId, LifelogError, NewActivity, NewExpense, NewTag, Tag,
    TagId,
};

/// Full-replacement edits. The target must exist and the replacement passes
/// the same checks as creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Editing: Send + Sync {
    async fn edit_tag(&self, id: TagId, tag: NewTag) -> Result<Tag, LifelogError>;

    async fn edit_activity(
        &self,
        id: ActivityId,
        activity: NewActivity,
    ) -> Result<Activity, LifelogError>;

    async fn edit_expense(
        &self,
        id: ExpenseId,
        expense: NewExpense,
    ) -> Result<Expense, LifelogError>;
}
