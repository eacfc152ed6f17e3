//! Expense entity and its validator.

use chrono::{DateTime, Utc};

use super::validation::{
    EXPENSE_LABEL_MAX, EXPENSE_LABEL_MIN, EXPENSE_UNIT_MAX, EXPENSE_UNIT_MIN, ValidationError,
    check_len,
};
use super::{ActivityId, ExpenseId, Tag, TagId};

/// Stored expense with its tags resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub label: String,
    pub time: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub activity_id: Option<ActivityId>,
    pub tags: Vec<Tag>,
}

/// Expense fields supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub label: String,
    pub time: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub activity_id: Option<ActivityId>,
    pub tag_ids: Vec<TagId>,
}

impl NewExpense {
    /// Lowercase the unit and check every field, stopping at the first
    /// violation.
    pub fn validate(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.unit = self.unit.to_lowercase();
        check_len(
            &self.label,
            EXPENSE_LABEL_MIN,
            EXPENSE_LABEL_MAX,
            ValidationError::ExpenseLabelLength,
        )?;
        check_len(
            &self.unit,
            EXPENSE_UNIT_MIN,
            EXPENSE_UNIT_MAX,
            ValidationError::ExpenseUnitLength,
        )?;
        if !(self.value.is_finite() && self.value > 0.0) {
            return Err(ValidationError::ExpenseValueNotPositive);
        }
        if self.activity_id.is_some_and(|id| id.get() < 0) {
            return Err(ValidationError::ExpenseActivityNegative);
        }
        if self.time > now {
            return Err(ValidationError::TimeInFuture);
        }
        Ok(())
    }

    /// Activity reference, ignoring the "no activity" sentinel. Negative ids
    /// never get this far; `validate` rejects them.
    pub fn linked_activity(&self) -> Option<ActivityId> {
        self.activity_id.filter(|id| id.get() > 0)
    }

    /// Build the stored form once the id and tags are known.
    pub fn into_expense(self, id: ExpenseId, tags: Vec<Tag>) -> Expense {
        let activity_id = self.linked_activity();
        Expense {
            id,
            label: self.label,
            time: self.time,
            value: self.value,
            unit: self.unit,
            activity_id,
            tags,
        }
    }
}
