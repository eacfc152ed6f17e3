//! Field constraint errors shared by the entity validators.
//!
//! Validators stop at the first failing constraint, so a caller only ever
//! sees one [`ValidationError`] per attempt.

use thiserror::Error;

/// Minimum tag name length in characters.
pub const TAG_NAME_MIN: usize = 3;
/// Maximum tag name length in characters.
pub const TAG_NAME_MAX: usize = 20;
/// Minimum activity label length.
pub const ACTIVITY_LABEL_MIN: usize = 5;
/// Maximum activity label length.
pub const ACTIVITY_LABEL_MAX: usize = 30;
/// Maximum activity place length.
pub const ACTIVITY_PLACE_MAX: usize = 30;
/// Maximum activity description length.
pub const ACTIVITY_DESC_MAX: usize = 255;
/// Minimum expense label length.
pub const EXPENSE_LABEL_MIN: usize = 2;
/// Maximum expense label length.
pub const EXPENSE_LABEL_MAX: usize = 50;
/// Minimum expense unit length.
pub const EXPENSE_UNIT_MIN: usize = 2;
/// Maximum expense unit length.
pub const EXPENSE_UNIT_MAX: usize = 10;

/// First constraint an entity failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tag name must be between {} and {} characters", TAG_NAME_MIN, TAG_NAME_MAX)]
    TagNameLength,
    #[error("tag name may only contain letters, digits, dashes, or underscores")]
    TagNameCharacters,
    #[error("activity label must be between {} and {} characters", ACTIVITY_LABEL_MIN, ACTIVITY_LABEL_MAX)]
    ActivityLabelLength,
    #[error("activity place must be at most {} characters", ACTIVITY_PLACE_MAX)]
    ActivityPlaceLength,
    #[error("activity description must be at most {} characters", ACTIVITY_DESC_MAX)]
    ActivityDescLength,
    #[error("activity duration must not be negative")]
    ActivityNegativeDuration,
    #[error("expense label must be between {} and {} characters", EXPENSE_LABEL_MIN, EXPENSE_LABEL_MAX)]
    ExpenseLabelLength,
    #[error("expense unit must be between {} and {} characters", EXPENSE_UNIT_MIN, EXPENSE_UNIT_MAX)]
    ExpenseUnitLength,
    #[error("expense value must be a positive number")]
    ExpenseValueNotPositive,
    #[error("expense activity id must not be negative")]
    ExpenseActivityNegative,
    #[error("time must not be in the future")]
    TimeInFuture,
}

impl ValidationError {
    /// Stable snake-case identifier for error details.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TagNameLength => "tag_name_length",
            Self::TagNameCharacters => "tag_name_characters",
            Self::ActivityLabelLength => "activity_label_length",
            Self::ActivityPlaceLength => "activity_place_length",
            Self::ActivityDescLength => "activity_desc_length",
            Self::ActivityNegativeDuration => "activity_negative_duration",
            Self::ExpenseLabelLength => "expense_label_length",
            Self::ExpenseUnitLength => "expense_unit_length",
            Self::ExpenseValueNotPositive => "expense_value_not_positive",
            Self::ExpenseActivityNegative => "expense_activity_negative",
            Self::TimeInFuture => "time_in_future",
        }
    }
}

/// Check a character count against an inclusive range.
pub(crate) fn check_len(
    value: &str,
    min: usize,
    max: usize,
    error: ValidationError,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if (min..=max).contains(&len) {
        Ok(())
    } else {
        Err(error)
    }
}
