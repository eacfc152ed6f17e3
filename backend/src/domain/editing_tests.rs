//! Tests for the editing service.

use std::sync::Arc;

use chrono::TimeDelta;
use mockall::predicate::eq;

use super::*;
use crate::domain::ports::{
    Adding, MockActivityRepository, MockExpenseRepository, MockTagRepository,
};
use crate::domain::service_test_helpers::{fixture_clock, new_activity, new_expense};
use crate::domain::{AddingService, ValidationError};
use crate::outbound::memory::InMemoryStore;

struct Harness {
    adding: AddingService<InMemoryStore, InMemoryStore, InMemoryStore>,
    editing: EditingService<InMemoryStore, InMemoryStore, InMemoryStore>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::default());
    Harness {
        adding: AddingService::new(store.clone(), store.clone(), store.clone(), fixture_clock()),
        editing: EditingService::new(store.clone(), store.clone(), store, fixture_clock()),
    }
}

#[tokio::test]
async fn edit_tag_renames_and_normalises() {
    let h = harness();
    let tag = h.adding.new_tag(NewTag::new("gym")).await.expect("tag");

    let renamed = h
        .editing
        .edit_tag(tag.id, NewTag::new("Gym-Time"))
        .await
        .expect("rename");
    assert_eq!(renamed, Tag::new(tag.id, "gym-time"));
}

#[tokio::test]
async fn edit_tag_may_keep_its_own_name() {
    let h = harness();
    let tag = h.adding.new_tag(NewTag::new("books")).await.expect("tag");

    let same = h
        .editing
        .edit_tag(tag.id, NewTag::new("BOOKS"))
        .await
        .expect("same name");
    assert_eq!(same, tag);
}

#[tokio::test]
async fn edit_tag_rejects_another_tags_name() {
    let h = harness();
    h.adding.new_tag(NewTag::new("music")).await.expect("tag");
    let other = h.adding.new_tag(NewTag::new("films")).await.expect("tag");

    let error = h
        .editing
        .edit_tag(other.id, NewTag::new("music"))
        .await
        .expect_err("collision");
    assert_eq!(error, LifelogError::DuplicateTagName("music".into()));
}

#[tokio::test]
async fn edit_missing_tag_is_not_found_before_validation() {
    let mut tags = MockTagRepository::new();
    tags.expect_find_by_id()
        .with(eq(TagId::new(3)))
        .times(1)
        .return_once(|_| Ok(None));
    let editing = EditingService::new(
        Arc::new(tags),
        Arc::new(MockActivityRepository::new()),
        Arc::new(MockExpenseRepository::new()),
        fixture_clock(),
    );

    let error = editing
        .edit_tag(TagId::new(3), NewTag::new("x"))
        .await
        .expect_err("missing tag");
    assert_eq!(error, LifelogError::TagNotFound(TagId::new(3)));
}

#[tokio::test]
async fn edit_activity_replaces_all_fields() {
    let h = harness();
    let tag = h.adding.new_tag(NewTag::new("travel")).await.expect("tag");
    let activity = h
        .adding
        .new_activity(new_activity("Train ride", TimeDelta::hours(5), &[tag.id.get()]))
        .await
        .expect("activity");

    let mut replacement = new_activity("Bus ride home", TimeDelta::hours(4), &[]);
    replacement.place = "Station".to_owned();
    replacement.duration = TimeDelta::minutes(90);
    let updated = h
        .editing
        .edit_activity(activity.id, replacement)
        .await
        .expect("edit");

    assert_eq!(updated.id, activity.id);
    assert_eq!(updated.label, "Bus ride home");
    assert_eq!(updated.place, "station");
    assert_eq!(updated.duration, TimeDelta::minutes(90));
    assert!(updated.tags.is_empty());
}

#[tokio::test]
async fn edit_activity_checks_tags_and_time() {
    let h = harness();
    let activity = h
        .adding
        .new_activity(new_activity("Reading time", TimeDelta::hours(1), &[]))
        .await
        .expect("activity");

    let missing_tag = h
        .editing
        .edit_activity(
            activity.id,
            new_activity("Reading time", TimeDelta::hours(1), &[42]),
        )
        .await
        .expect_err("missing tag");
    assert_eq!(missing_tag, LifelogError::TagNotFound(TagId::new(42)));

    let mut future = new_activity("Reading time", TimeDelta::hours(1), &[]);
    future.duration = TimeDelta::hours(3);
    let in_future = h
        .editing
        .edit_activity(activity.id, future)
        .await
        .expect_err("ends in the future");
    assert_eq!(
        in_future,
        LifelogError::Validation(ValidationError::TimeInFuture)
    );
}

#[tokio::test]
async fn edit_missing_activity_is_not_found() {
    let h = harness();
    let error = h
        .editing
        .edit_activity(
            ActivityId::new(11),
            new_activity("Ghost event", TimeDelta::hours(1), &[]),
        )
        .await
        .expect_err("missing activity");
    assert_eq!(error, LifelogError::ActivityNotFound(ActivityId::new(11)));
}

#[tokio::test]
async fn edit_expense_rechecks_activity_reference() {
    let h = harness();
    let expense = h
        .adding
        .new_expense(new_expense("Lunch", TimeDelta::hours(2), None, &[]))
        .await
        .expect("expense");

    let error = h
        .editing
        .edit_expense(
            expense.id,
            new_expense("Lunch", TimeDelta::hours(2), Some(5), &[]),
        )
        .await
        .expect_err("missing activity");
    assert_eq!(error, LifelogError::ActivityNotFound(ActivityId::new(5)));

    let mut replacement = new_expense("Late lunch", TimeDelta::hours(1), None, &[]);
    replacement.value = 20.0;
    let updated = h
        .editing
        .edit_expense(expense.id, replacement)
        .await
        .expect("edit");
    assert_eq!(updated.label, "Late lunch");
    assert!((updated.value - 20.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn edit_missing_expense_is_not_found() {
    let h = harness();
    let error = h
        .editing
        .edit_expense(
            ExpenseId::new(8),
            new_expense("Phantom", TimeDelta::hours(1), None, &[]),
        )
        .await
        .expect_err("missing expense");
    assert_eq!(error, LifelogError::ExpenseNotFound(ExpenseId::new(8)));
}
