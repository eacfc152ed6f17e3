//! Read-only queries over tags, activities, and expenses.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;

use crate::domain::ports::{ActivityRepository, ExpenseRepository, Listing, TagRepository};
use crate::domain::references::{ensure_activity, ensure_tag};
use crate::domain::{
    Activity, ActivityId, Expense, ExpenseId, LifelogError, Tag, TagId, ValidationError,
};

/// Service implementing the [`Listing`] driving port.
#[derive(Clone)]
pub struct ListingService<T, A, E> {
    tags: Arc<T>,
    activities: Arc<A>,
    expenses: Arc<E>,
    clock: Arc<dyn Clock>,
}

impl<T, A, E> ListingService<T, A, E> {
    pub fn new(tags: Arc<T>, activities: Arc<A>, expenses: Arc<E>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tags,
            activities,
            expenses,
            clock,
        }
    }

    fn ensure_past(&self, since: DateTime<Utc>) -> Result<(), LifelogError> {
        if since > self.clock.utc() {
            return Err(ValidationError::TimeInFuture.into());
        }
        Ok(())
    }
}

/// Newest first, higher id first on equal times.
fn newest_first<I: Ord>(a: (DateTime<Utc>, I), b: (DateTime<Utc>, I)) -> Ordering {
    b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1))
}

fn sort_activities(mut activities: Vec<Activity>) -> Vec<Activity> {
    activities.sort_by(|a, b| newest_first((a.time, a.id), (b.time, b.id)));
    activities
}

fn sort_expenses(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| newest_first((a.time, a.id), (b.time, b.id)));
    expenses
}

#[async_trait]
impl<T, A, E> Listing for ListingService<T, A, E>
where
    T: TagRepository,
    A: ActivityRepository,
    E: ExpenseRepository,
{
    async fn activities_by_time(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<Activity>, LifelogError> {
        self.ensure_past(since)?;
        let activities = self.activities.list_since(since).await?;
        Ok(sort_activities(activities))
    }

    async fn expenses_by_time(&self, since: DateTime<Utc>) -> Result<Vec<Expense>, LifelogError> {
        self.ensure_past(since)?;
        let expenses = self.expenses.list_since(since).await?;
        Ok(sort_expenses(expenses))
    }

    async fn all_tags(&self) -> Result<Vec<Tag>, LifelogError> {
        let mut tags = self.tags.list().await?;
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn activity(&self, id: ActivityId) -> Result<Activity, LifelogError> {
        self.activities
            .find_by_id(id)
            .await?
            .ok_or(LifelogError::ActivityNotFound(id))
    }

    async fn expense(&self, id: ExpenseId) -> Result<Expense, LifelogError> {
        self.expenses
            .find_by_id(id)
            .await?
            .ok_or(LifelogError::ExpenseNotFound(id))
    }

    async fn activities_by_tag(&self, id: TagId) -> Result<Vec<Activity>, LifelogError> {
        ensure_tag(self.tags.as_ref(), id).await?;
        let activities = self.activities.list_by_tag(id).await?;
        Ok(sort_activities(activities))
    }

    async fn expenses_by_tag(&self, id: TagId) -> Result<Vec<Expense>, LifelogError> {
        ensure_tag(self.tags.as_ref(), id).await?;
        let expenses = self.expenses.list_by_tag(id).await?;
        Ok(sort_expenses(expenses))
    }

    async fn expenses_by_activity(&self, id: ActivityId) -> Result<Vec<Expense>, LifelogError> {
        ensure_activity(self.activities.as_ref(), id).await?;
        let expenses = self.expenses.list_by_activity(id).await?;
        Ok(sort_expenses(expenses))
    }
}

#[cfg(test)]
#[path = "listing_tests.rs"]
mod tests;
