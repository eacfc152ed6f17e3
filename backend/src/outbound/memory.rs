//! In-memory storage adapter.
//!
//! Used when no database URL is configured and throughout the service tests.
//! All tables and the id counter sit behind one mutex, so writes are
//! serialised and ids are never handed out twice. Activities and expenses
//! keep tag ids only; tag names are resolved on every read so a renamed tag
//! shows its new name everywhere.
//!
//! The store enforces the same integrity rules as the database schema:
//! tag names are unique, writes may only link existing tags and activities,
//! and a tag or activity cannot be deleted while rows still link to it.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::ports::{
    ActivityRepository, ExpenseRepository, Reference, Referrer, RepositoryError, TagRepository,
};
use crate::domain::{
    Activity, ActivityId, Expense, ExpenseId, NewActivity, NewExpense, NewTag, Tag, TagId,
};

#[derive(Debug, Clone)]
struct ActivityRow {
    label: String,
    place: String,
    desc: String,
    time: DateTime<Utc>,
    duration: TimeDelta,
    tag_ids: Vec<TagId>,
}

#[derive(Debug, Clone)]
struct ExpenseRow {
    label: String,
    time: DateTime<Utc>,
    value: f64,
    unit: String,
    activity_id: Option<ActivityId>,
    tag_ids: Vec<TagId>,
}

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    tags: BTreeMap<TagId, String>,
    activities: BTreeMap<ActivityId, ActivityRow>,
    expenses: BTreeMap<ExpenseId, ExpenseRow>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn claim_name(&self, name: &str, owner: Option<TagId>) -> Result<(), RepositoryError> {
        let taken = self
            .tags
            .iter()
            .any(|(id, stored)| stored == name && Some(*id) != owner);
        if taken {
            return Err(RepositoryError::duplicate(format!("tag name {name}")));
        }
        Ok(())
    }

    fn require_tags(&self, ids: &[TagId]) -> Result<(), RepositoryError> {
        match ids.iter().find(|id| !self.tags.contains_key(id)) {
            Some(missing) => Err(RepositoryError::missing_reference(Reference::Tag(*missing))),
            None => Ok(()),
        }
    }

    fn require_activity(&self, id: Option<ActivityId>) -> Result<(), RepositoryError> {
        match id {
            Some(id) if !self.activities.contains_key(&id) => {
                Err(RepositoryError::missing_reference(Reference::Activity(id)))
            }
            _ => Ok(()),
        }
    }

    fn tag_referrer(&self, id: TagId) -> Option<Referrer> {
        if self.expenses.values().any(|row| row.tag_ids.contains(&id)) {
            Some(Referrer::Expenses)
        } else if self.activities.values().any(|row| row.tag_ids.contains(&id)) {
            Some(Referrer::Activities)
        } else {
            None
        }
    }

    fn tags_for(&self, ids: &[TagId]) -> Vec<Tag> {
        ids.iter()
            .filter_map(|id| self.tags.get(id).map(|name| Tag::new(*id, name.clone())))
            .collect()
    }

    fn activity(&self, id: ActivityId, row: &ActivityRow) -> Activity {
        Activity {
            id,
            label: row.label.clone(),
            place: row.place.clone(),
            desc: row.desc.clone(),
            time: row.time,
            duration: row.duration,
            tags: self.tags_for(&row.tag_ids),
        }
    }

    fn expense(&self, id: ExpenseId, row: &ExpenseRow) -> Expense {
        Expense {
            id,
            label: row.label.clone(),
            time: row.time,
            value: row.value,
            unit: row.unit.clone(),
            activity_id: row.activity_id,
            tags: self.tags_for(&row.tag_ids),
        }
    }

    fn activities_where(&self, keep: impl Fn(&ActivityRow) -> bool) -> Vec<Activity> {
        self.activities
            .iter()
            .filter(|(_, row)| keep(row))
            .map(|(id, row)| self.activity(*id, row))
            .collect()
    }

    fn expenses_where(&self, keep: impl Fn(&ExpenseRow) -> bool) -> Vec<Expense> {
        self.expenses
            .iter()
            .filter(|(_, row)| keep(row))
            .map(|(id, row)| self.expense(*id, row))
            .collect()
    }
}

fn tag_ids(tags: &[Tag]) -> Vec<TagId> {
    tags.iter().map(|tag| tag.id).collect()
}

/// Map-backed store implementing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    fn lock(&self) -> Result<MutexGuard<'_, State>, RepositoryError> {
        self.state
            .lock()
            .map_err(|_| RepositoryError::connection("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl TagRepository for InMemoryStore {
    async fn find_by_id(&self, id: TagId) -> Result<Option<Tag>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.tags.get(&id).map(|name| Tag::new(id, name.clone())))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .tags
            .iter()
            .find(|(_, stored)| stored.as_str() == name)
            .map(|(id, stored)| Tag::new(*id, stored.clone())))
    }

    async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .tags
            .iter()
            .map(|(id, name)| Tag::new(*id, name.clone()))
            .collect())
    }

    async fn insert(&self, tag: &NewTag) -> Result<Tag, RepositoryError> {
        let mut state = self.lock()?;
        state.claim_name(&tag.name, None)?;
        let id = TagId::new(state.next_id());
        state.tags.insert(id, tag.name.clone());
        Ok(Tag::new(id, tag.name.clone()))
    }

    async fn update(&self, tag: &Tag) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if state.tags.contains_key(&tag.id) {
            state.claim_name(&tag.name, Some(tag.id))?;
        }
        match state.tags.get_mut(&tag.id) {
            Some(name) => {
                name.clone_from(&tag.name);
                Ok(())
            }
            None => Err(RepositoryError::query(format!("tag {} does not exist", tag.id))),
        }
    }

    async fn delete(&self, id: TagId) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if let Some(by) = state.tag_referrer(id) {
            return Err(RepositoryError::still_referenced(by));
        }
        state.tags.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for InMemoryStore {
    async fn find_by_id(&self, id: ActivityId) -> Result<Option<Activity>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.activities.get(&id).map(|row| state.activity(id, row)))
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Activity>, RepositoryError> {
        Ok(self.lock()?.activities_where(|row| row.time >= since))
    }

    async fn list_by_tag(&self, tag_id: TagId) -> Result<Vec<Activity>, RepositoryError> {
        Ok(self
            .lock()?
            .activities_where(|row| row.tag_ids.contains(&tag_id)))
    }

    async fn has_tag(&self, tag_id: TagId) -> Result<bool, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .activities
            .values()
            .any(|row| row.tag_ids.contains(&tag_id)))
    }

    async fn insert(
        &self,
        activity: &NewActivity,
        tags: &[Tag],
    ) -> Result<Activity, RepositoryError> {
        let mut state = self.lock()?;
        let tag_ids = tag_ids(tags);
        state.require_tags(&tag_ids)?;
        let id = ActivityId::new(state.next_id());
        let row = ActivityRow {
            label: activity.label.clone(),
            place: activity.place.clone(),
            desc: activity.desc.clone(),
            time: activity.time,
            duration: activity.duration,
            tag_ids,
        };
        let stored = state.activity(id, &row);
        state.activities.insert(id, row);
        Ok(stored)
    }

    async fn update(&self, activity: &Activity) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let tag_ids = tag_ids(&activity.tags);
        state.require_tags(&tag_ids)?;
        let Some(row) = state.activities.get_mut(&activity.id) else {
            return Err(RepositoryError::query(format!(
                "activity {} does not exist",
                activity.id
            )));
        };
        *row = ActivityRow {
            label: activity.label.clone(),
            place: activity.place.clone(),
            desc: activity.desc.clone(),
            time: activity.time,
            duration: activity.duration,
            tag_ids,
        };
        Ok(())
    }

    async fn delete(&self, id: ActivityId) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        if state.expenses.values().any(|row| row.activity_id == Some(id)) {
            return Err(RepositoryError::still_referenced(Referrer::Expenses));
        }
        state.activities.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ExpenseRepository for InMemoryStore {
    async fn find_by_id(&self, id: ExpenseId) -> Result<Option<Expense>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.expenses.get(&id).map(|row| state.expense(id, row)))
    }

    async fn list_since(&self, since: DateTime<Utc>) -> Result<Vec<Expense>, RepositoryError> {
        Ok(self.lock()?.expenses_where(|row| row.time >= since))
    }

    async fn list_by_tag(&self, tag_id: TagId) -> Result<Vec<Expense>, RepositoryError> {
        Ok(self
            .lock()?
            .expenses_where(|row| row.tag_ids.contains(&tag_id)))
    }

    async fn list_by_activity(
        &self,
        activity_id: ActivityId,
    ) -> Result<Vec<Expense>, RepositoryError> {
        Ok(self
            .lock()?
            .expenses_where(|row| row.activity_id == Some(activity_id)))
    }

    async fn has_tag(&self, tag_id: TagId) -> Result<bool, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .expenses
            .values()
            .any(|row| row.tag_ids.contains(&tag_id)))
    }

    async fn has_activity(&self, activity_id: ActivityId) -> Result<bool, RepositoryError> {
        let state = self.lock()?;
        Ok(state
            .expenses
            .values()
            .any(|row| row.activity_id == Some(activity_id)))
    }

    async fn insert(
        &self,
        expense: &NewExpense,
        tags: &[Tag],
    ) -> Result<Expense, RepositoryError> {
        let mut state = self.lock()?;
        let tag_ids = tag_ids(tags);
        state.require_tags(&tag_ids)?;
        state.require_activity(expense.linked_activity())?;
        let id = ExpenseId::new(state.next_id());
        let row = ExpenseRow {
            label: expense.label.clone(),
            time: expense.time,
            value: expense.value,
            unit: expense.unit.clone(),
            activity_id: expense.linked_activity(),
            tag_ids,
        };
        let stored = state.expense(id, &row);
        state.expenses.insert(id, row);
        Ok(stored)
    }

    async fn update(&self, expense: &Expense) -> Result<(), RepositoryError> {
        let mut state = self.lock()?;
        let tag_ids = tag_ids(&expense.tags);
        state.require_tags(&tag_ids)?;
        state.require_activity(expense.activity_id)?;
        let Some(row) = state.expenses.get_mut(&expense.id) else {
            return Err(RepositoryError::query(format!(
                "expense {} does not exist",
                expense.id
            )));
        };
        *row = ExpenseRow {
            label: expense.label.clone(),
            time: expense.time,
            value: expense.value,
            unit: expense.unit.clone(),
            activity_id: expense.activity_id,
            tag_ids,
        };
        Ok(())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        self.lock()?.expenses.remove(&id);
        Ok(())
    }

    async fn delete_by_activity(&self, activity_id: ActivityId) -> Result<u64, RepositoryError> {
        let mut state = self.lock()?;
        let before = state.expenses.len();
        state
            .expenses
            .retain(|_, row| row.activity_id != Some(activity_id));
        let removed = before - state.expenses.len();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> InMemoryStore {
        InMemoryStore::default()
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn activity(hour: u32) -> NewActivity {
        NewActivity {
            label: "Walk the dog".to_owned(),
            place: "park".to_owned(),
            desc: String::new(),
            time: at(hour),
            duration: TimeDelta::minutes(30),
            tag_ids: vec![],
        }
    }

    fn expense(activity_id: Option<ActivityId>) -> NewExpense {
        NewExpense {
            label: "Treats".to_owned(),
            time: at(10),
            value: 2.0,
            unit: "eur".to_owned(),
            activity_id,
            tag_ids: vec![],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_unique_across_tables(store: InMemoryStore) {
        let tag = TagRepository::insert(&store, &NewTag::new("dogs"))
            .await
            .expect("tag");
        let activity = ActivityRepository::insert(&store, &activity(9), &[])
            .await
            .expect("activity");
        let expense = ExpenseRepository::insert(&store, &expense(None), &[])
            .await
            .expect("expense");
        assert_eq!(
            [tag.id.get(), activity.id.get(), expense.id.get()],
            [1, 2, 3]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_ids_are_not_reused(store: InMemoryStore) {
        let first = TagRepository::insert(&store, &NewTag::new("one"))
            .await
            .expect("tag");
        TagRepository::delete(&store, first.id).await.expect("delete");
        let second = TagRepository::insert(&store, &NewTag::new("two"))
            .await
            .expect("tag");
        assert!(second.id > first.id);
    }

    #[rstest]
    #[tokio::test]
    async fn renamed_tags_show_on_linked_entities(store: InMemoryStore) {
        let tag = TagRepository::insert(&store, &NewTag::new("old-name"))
            .await
            .expect("tag");
        let stored = ActivityRepository::insert(&store, &activity(9), &[tag.clone()])
            .await
            .expect("activity");

        TagRepository::update(&store, &Tag::new(tag.id, "new-name"))
            .await
            .expect("rename");
        let fetched = ActivityRepository::find_by_id(&store, stored.id)
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(fetched.tags, vec![Tag::new(tag.id, "new-name")]);
        assert!(ActivityRepository::has_tag(&store, tag.id).await.expect("has tag"));
    }

    #[rstest]
    #[tokio::test]
    async fn list_since_is_inclusive(store: InMemoryStore) {
        ActivityRepository::insert(&store, &activity(8), &[])
            .await
            .expect("activity");
        ActivityRepository::insert(&store, &activity(9), &[])
            .await
            .expect("activity");
        let listed = ActivityRepository::list_since(&store, at(9))
            .await
            .expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].time, at(9));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_by_activity_counts_removed_rows(store: InMemoryStore) {
        let walk = ActivityRepository::insert(&store, &activity(9), &[])
            .await
            .expect("activity");
        for link in [Some(walk.id), Some(walk.id), None] {
            ExpenseRepository::insert(&store, &expense(link), &[])
                .await
                .expect("expense");
        }

        let removed = ExpenseRepository::delete_by_activity(&store, walk.id)
            .await
            .expect("delete");
        assert_eq!(removed, 2);
        assert!(
            !ExpenseRepository::has_activity(&store, walk.id)
                .await
                .expect("check")
        );
        let remaining = ExpenseRepository::list_since(&store, at(0))
            .await
            .expect("list");
        assert_eq!(remaining.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn updating_missing_rows_fails(store: InMemoryStore) {
        let result = TagRepository::update(&store, &Tag::new(TagId::new(5), "ghost")).await;
        assert!(matches!(result, Err(RepositoryError::Query { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn tag_names_stay_unique(store: InMemoryStore) {
        let walk = TagRepository::insert(&store, &NewTag::new("walk"))
            .await
            .expect("tag");
        let run = TagRepository::insert(&store, &NewTag::new("run"))
            .await
            .expect("tag");

        let again = TagRepository::insert(&store, &NewTag::new("walk")).await;
        assert!(matches!(again, Err(RepositoryError::Duplicate { .. })));
        let rename = TagRepository::update(&store, &Tag::new(run.id, "walk")).await;
        assert!(matches!(rename, Err(RepositoryError::Duplicate { .. })));
        TagRepository::update(&store, &walk)
            .await
            .expect("keeping its own name");

        let names: Vec<String> = TagRepository::list(&store)
            .await
            .expect("list")
            .into_iter()
            .map(|tag| tag.name)
            .collect();
        assert_eq!(names, vec!["walk".to_owned(), "run".to_owned()]);
    }

    #[rstest]
    #[tokio::test]
    async fn linked_rows_block_deletes(store: InMemoryStore) {
        let shared = TagRepository::insert(&store, &NewTag::new("shared"))
            .await
            .expect("tag");
        let outdoors = TagRepository::insert(&store, &NewTag::new("outdoors"))
            .await
            .expect("tag");
        let linked = [shared.clone(), outdoors.clone()];
        let walk = ActivityRepository::insert(&store, &activity(9), &linked)
            .await
            .expect("activity");
        let treats = ExpenseRepository::insert(&store, &expense(Some(walk.id)), &linked[..1])
            .await
            .expect("expense");

        assert_eq!(
            TagRepository::delete(&store, shared.id).await,
            Err(RepositoryError::still_referenced(Referrer::Expenses))
        );
        assert_eq!(
            TagRepository::delete(&store, outdoors.id).await,
            Err(RepositoryError::still_referenced(Referrer::Activities))
        );
        assert_eq!(
            ActivityRepository::delete(&store, walk.id).await,
            Err(RepositoryError::still_referenced(Referrer::Expenses))
        );

        ExpenseRepository::delete(&store, treats.id)
            .await
            .expect("expense delete");
        ActivityRepository::delete(&store, walk.id)
            .await
            .expect("activity delete");
        TagRepository::delete(&store, shared.id)
            .await
            .expect("tag delete");
    }

    #[rstest]
    #[tokio::test]
    async fn writes_must_link_stored_rows(store: InMemoryStore) {
        let ghost_tag = Tag::new(TagId::new(40), "ghost");
        let ghost_activity = ActivityId::new(41);

        let activity_result =
            ActivityRepository::insert(&store, &activity(9), &[ghost_tag.clone()]).await;
        assert_eq!(
            activity_result.map(|stored| stored.id),
            Err(RepositoryError::missing_reference(Reference::Tag(ghost_tag.id)))
        );
        let expense_result =
            ExpenseRepository::insert(&store, &expense(Some(ghost_activity)), &[]).await;
        assert_eq!(
            expense_result.map(|stored| stored.id),
            Err(RepositoryError::missing_reference(Reference::Activity(ghost_activity)))
        );

        let stored = ExpenseRepository::insert(&store, &expense(None), &[])
            .await
            .expect("unlinked expense");
        let relinked = Expense {
            activity_id: Some(ghost_activity),
            ..stored
        };
        assert_eq!(
            ExpenseRepository::update(&store, &relinked).await,
            Err(RepositoryError::missing_reference(Reference::Activity(ghost_activity)))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_across_tables_get_distinct_ids() {
        const WRITERS: usize = 16;
        let store = Arc::new(InMemoryStore::default());
        let mut handles = Vec::with_capacity(WRITERS);
        for writer in 0..WRITERS {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let store = store.as_ref();
                let tag = TagRepository::insert(store, &NewTag::new(format!("tag-{writer}")))
                    .await
                    .expect("tag");
                let linked = [tag.clone()];
                let walk = ActivityRepository::insert(store, &activity(9), &linked)
                    .await
                    .expect("activity");
                let treats = ExpenseRepository::insert(store, &expense(Some(walk.id)), &linked)
                    .await
                    .expect("expense");
                [tag.id.get(), walk.id.get(), treats.id.get()]
            }));
        }

        let mut ids = BTreeSet::new();
        for handle in handles {
            ids.extend(handle.await.expect("writer task"));
        }
        assert_eq!(ids.len(), WRITERS * 3);
        assert_eq!(ids.last().copied(), i64::try_from(WRITERS * 3).ok());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_duplicate_tag_inserts_store_one_row() {
        const WRITERS: usize = 16;
        let store = Arc::new(InMemoryStore::default());
        let mut handles = Vec::with_capacity(WRITERS);
        for _ in 0..WRITERS {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                TagRepository::insert(store.as_ref(), &NewTag::new("walk")).await
            }));
        }

        let mut stored = 0;
        for handle in handles {
            match handle.await.expect("writer task") {
                Ok(_) => stored += 1,
                Err(err) => assert!(matches!(err, RepositoryError::Duplicate { .. })),
            }
        }
        assert_eq!(stored, 1);
        assert_eq!(TagRepository::list(store.as_ref()).await.expect("list").len(), 1);
    }
}
