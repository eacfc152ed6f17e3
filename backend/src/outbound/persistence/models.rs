//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, TimeDelta, Utc};
use diesel::prelude::*;

use crate::domain::{
    Activity, ActivityId, Expense, ExpenseId, NewActivity, NewExpense, Tag, TagId,
};

use super::schema::{activities, activity_tags, expense_tags, expenses, tags};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub name: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag::new(TagId::new(row.id), row.name)
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tags)]
pub(crate) struct TagValues<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = activities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ActivityRow {
    pub id: i64,
    pub label: String,
    pub place: String,
    pub description: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: i64,
}

impl ActivityRow {
    pub(crate) fn into_activity(self, tags: Vec<Tag>) -> Activity {
        Activity {
            id: ActivityId::new(self.id),
            label: self.label,
            place: self.place,
            desc: self.description,
            time: self.started_at,
            duration: TimeDelta::try_seconds(self.duration_secs).unwrap_or(TimeDelta::MAX),
            tags,
        }
    }
}

/// Column values shared by activity inserts and full-row updates.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = activities)]
pub(crate) struct ActivityValues<'a> {
    pub label: &'a str,
    pub place: &'a str,
    pub description: &'a str,
    pub started_at: DateTime<Utc>,
    pub duration_secs: i64,
}

impl<'a> From<&'a NewActivity> for ActivityValues<'a> {
    fn from(activity: &'a NewActivity) -> Self {
        Self {
            label: &activity.label,
            place: &activity.place,
            description: &activity.desc,
            started_at: activity.time,
            duration_secs: activity.duration.num_seconds(),
        }
    }
}

impl<'a> From<&'a Activity> for ActivityValues<'a> {
    fn from(activity: &'a Activity) -> Self {
        Self {
            label: &activity.label,
            place: &activity.place,
            description: &activity.desc,
            started_at: activity.time,
            duration_secs: activity.duration.num_seconds(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ExpenseRow {
    pub id: i64,
    pub label: String,
    pub spent_at: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub activity_id: Option<i64>,
}

impl ExpenseRow {
    pub(crate) fn into_expense(self, tags: Vec<Tag>) -> Expense {
        Expense {
            id: ExpenseId::new(self.id),
            label: self.label,
            time: self.spent_at,
            value: self.value,
            unit: self.unit,
            activity_id: self.activity_id.map(ActivityId::new),
            tags,
        }
    }
}

/// Column values shared by expense inserts and full-row updates. A `None`
/// activity clears the link on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = expenses)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ExpenseValues<'a> {
    pub label: &'a str,
    pub spent_at: DateTime<Utc>,
    pub value: f64,
    pub unit: &'a str,
    pub activity_id: Option<i64>,
}

impl<'a> From<&'a NewExpense> for ExpenseValues<'a> {
    fn from(expense: &'a NewExpense) -> Self {
        Self {
            label: &expense.label,
            spent_at: expense.time,
            value: expense.value,
            unit: &expense.unit,
            activity_id: expense.linked_activity().map(ActivityId::get),
        }
    }
}

impl<'a> From<&'a Expense> for ExpenseValues<'a> {
    fn from(expense: &'a Expense) -> Self {
        Self {
            label: &expense.label,
            spent_at: expense.time,
            value: expense.value,
            unit: &expense.unit,
            activity_id: expense.activity_id.map(ActivityId::get),
        }
    }
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = activity_tags)]
pub(crate) struct ActivityTagRow {
    pub activity_id: i64,
    pub tag_id: i64,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = expense_tags)]
pub(crate) struct ExpenseTagRow {
    pub expense_id: i64,
    pub tag_id: i64,
}
