//! Creation service.
//!
//! Validates new tags, activities, and expenses against the injected clock,
//! checks their references, and stores them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{Adding, ActivityRepository, ExpenseRepository, TagRepository};
use crate::domain::references::{ensure_activity, resolve_tags, tag_name_conflict};
use crate::domain::{Activity, Expense, LifelogError, NewActivity, NewExpense, NewTag, Tag};

/// Service implementing the [`Adding`] driving port.
#[derive(Clone)]
pub struct AddingService<T, A, E> {
    tags: Arc<T>,
    activities: Arc<A>,
    expenses: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<T, A, E> AddingService<T, A, E> {
    /// Create a service over the given repositories.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use lifelog_backend::domain::AddingService;
    /// # use lifelog_backend::outbound::memory::InMemoryStore;
    /// let store = Arc::new(InMemoryStore::default());
    /// let service = AddingService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
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
impl<T, A, E> Adding for AddingService<T, A, E>
where
    T: TagRepository,
    A: ActivityRepository,
    E: ExpenseRepository,
{
    async fn new_tag(&self, mut tag: NewTag) -> Result<Tag, LifelogError> {
        tag.validate()?;
        if self.tags.find_by_name(&tag.name).await?.is_some() {
            return Err(LifelogError::DuplicateTagName(tag.name));
        }
        let stored = self
            .tags
            .insert(&tag)
            .await
            .map_err(|err| tag_name_conflict(err, &tag.name))?;
        info!(tag_id = %stored.id, name = %stored.name, "tag created");
        Ok(stored)
    }

    async fn new_activity(&self, mut activity: NewActivity) -> Result<Activity, LifelogError> {
        activity.validate(self.clock.utc())?;
        let tags = resolve_tags(self.tags.as_ref(), &activity.tag_ids).await?;
        let stored = self.activities.insert(&activity, &tags).await?;
        info!(activity_id = %stored.id, "activity created");
        Ok(stored)
    }

    async fn new_expense(&self, mut expense: NewExpense) -> Result<Expense, LifelogError> {
        expense.validate(self.clock.utc())?;
        if let Some(activity_id) = expense.linked_activity() {
            ensure_activity(self.activities.as_ref(), activity_id).await?;
        }
        let tags = resolve_tags(self.tags.as_ref(), &expense.tag_ids).await?;
        let stored = self.expenses.insert(&expense, &tags).await?;
        info!(expense_id = %stored.id, "expense created");
        Ok(stored)
    }
}

#[cfg(test)]
#[path = "adding_tests.rs"]
mod tests;
