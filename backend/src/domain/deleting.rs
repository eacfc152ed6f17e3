//! Guarded deletes.
//!
//! Nothing cascades. A tag goes only once no expense or activity carries it,
//! and an activity goes only once its expenses are gone. The checks here
//! name the blocking table; the store refuses the delete as well if a link
//! appears in between.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{ActivityRepository, Deleting, ExpenseRepository, TagRepository};
use crate::domain::references::{
    activity_delete_conflict, ensure_activity, ensure_tag, tag_delete_conflict,
};
use crate::domain::{ActivityId, ExpenseId, LifelogError, TagId};

/// Service implementing the [`Deleting`] driving port.
#[derive(Clone)]
pub struct DeletingService<T, A, E> {
    tags: Arc<T>,
    activities: Arc<A>,
    expenses: Arc<E>,
}

impl<T, A, E> DeletingService<T, A, E> {
    pub fn new(tags: Arc<T>, activities: Arc<A>, expenses: Arc<E>) -> Self {
        Self {
            tags,
            activities,
            expenses,
        }
    }
}

#[async_trait]
impl<T, A, E> Deleting for DeletingService<T, A, E>
where
    T: TagRepository,
    A: ActivityRepository,
    E: ExpenseRepository,
{
    async fn tag(&self, id: TagId) -> Result<(), LifelogError> {
        ensure_tag(self.tags.as_ref(), id).await?;
        if self.expenses.has_tag(id).await? {
            return Err(LifelogError::TagHasExpenses(id));
        }
        if self.activities.has_tag(id).await? {
            return Err(LifelogError::TagHasActivities(id));
        }
        self.tags
            .delete(id)
            .await
            .map_err(|err| tag_delete_conflict(err, id))?;
        info!(tag_id = %id, "tag deleted");
        Ok(())
    }

    async fn activity(&self, id: ActivityId) -> Result<(), LifelogError> {
        ensure_activity(self.activities.as_ref(), id).await?;
        if self.expenses.has_activity(id).await? {
            return Err(LifelogError::ActivityHasExpenses(id));
        }
        self.activities
            .delete(id)
            .await
            .map_err(|err| activity_delete_conflict(err, id))?;
        info!(activity_id = %id, "activity deleted");
        Ok(())
    }

    async fn expense(&self, id: ExpenseId) -> Result<(), LifelogError> {
        if self.expenses.find_by_id(id).await?.is_none() {
            return Err(LifelogError::ExpenseNotFound(id));
        }
        self.expenses.delete(id).await?;
        info!(expense_id = %id, "expense deleted");
        Ok(())
    }

    async fn activity_expenses(&self, id: ActivityId) -> Result<u64, LifelogError> {
        ensure_activity(self.activities.as_ref(), id).await?;
        let deleted = self.expenses.delete_by_activity(id).await?;
        info!(activity_id = %id, deleted, "activity expenses deleted");
        Ok(deleted)
    }
}

#[cfg(test)]
#[path = "deleting_tests.rs"]
mod tests;
