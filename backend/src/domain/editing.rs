//! Replacement edits for stored entities.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{ActivityRepository, Editing, ExpenseRepository, TagRepository};
use crate::domain::references::{ensure_activity, resolve_tags, tag_name_conflict};
use crate::domain::{
    Activity, ActivityId, Expense, ExpenseId, LifelogError, NewActivity, NewExpense, NewTag, Tag,
    TagId,
};

/// Service implementing the [`Editing`] driving port.
#[derive(Clone)]
pub struct EditingService<T, A, E> {
    tags: Arc<T>,
    activities: Arc<A>,
    expenses: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<T, A, E> EditingService<T, A, E> {
    pub fn new(tags: Arc<T>, activities: Arc<A>, expenses: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tags,
            activities,
            expenses,
            clock,
        }
    }
}

#[async_trait]
impl<T, A, E> Editing for EditingService<T, A, E>
where
    T: TagRepository,
    A: ActivityRepository,
    E: ExpenseRepository,
{
    async fn edit_tag(&self, id: TagId, mut tag: NewTag) -> Result<Tag, LifelogError> {
        if self.tags.find_by_id(id).await?.is_none() {
            return Err(LifelogError::TagNotFound(id));
        }
        tag.validate()?;
        let taken = self.tags.find_by_name(&tag.name).await?;
        if taken.is_some_and(|existing| existing.id != id) {
            return Err(LifelogError::DuplicateTagName(tag.name));
        }
        let updated = Tag::new(id, tag.name);
        self.tags
            .update(&updated)
            .await
            .map_err(|err| tag_name_conflict(err, &updated.name))?;
        info!(tag_id = %id, name = %updated.name, "tag updated");
        Ok(updated)
    }

    async fn edit_activity(
        &self,
        id: ActivityId,
        mut activity: NewActivity,
    ) -> Result<Activity, LifelogError> {
        ensure_activity(self.activities.as_ref(), id).await?;
        activity.validate(self.clock.utc())?;
        let tags = resolve_tags(self.tags.as_ref(), &activity.tag_ids).await?;
        let updated = activity.into_activity(id, tags);
        self.activities.update(&updated).await?;
        info!(activity_id = %id, "activity updated");
        Ok(updated)
    }

    async fn edit_expense(
        &self,
        id: ExpenseId,
        mut expense: NewExpense,
    ) -> Result<Expense, LifelogError> {
        if self.expenses.find_by_id(id).await?.is_none() {
            return Err(LifelogError::ExpenseNotFound(id));
        }
        expense.validate(self.clock.utc())?;
        if let Some(activity_id) = expense.linked_activity() {
            ensure_activity(self.activities.as_ref(), activity_id).await?;
        }
        let tags = resolve_tags(self.tags.as_ref(), &expense.tag_ids).await?;
        let updated = expense.into_expense(id, tags);
        self.expenses.update(&updated).await?;
        info!(expense_id = %id, "expense updated");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "editing_tests.rs"]
mod tests;
