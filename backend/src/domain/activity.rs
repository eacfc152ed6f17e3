//! Activity entity and its validator.

use chrono::{DateTime, TimeDelta, Utc};

use super::validation::{
    ACTIVITY_DESC_MAX, ACTIVITY_LABEL_MAX, ACTIVITY_LABEL_MIN, ACTIVITY_PLACE_MAX,
    ValidationError, check_len,
};
use super::{ActivityId, Tag, TagId};

/// Stored activity with its tags resolved.
///
/// ## Invariants
/// - `time + duration` is not after the moment the activity was validated.
/// - `place` is lowercase.
/// - `tags` holds each tag once, ordered by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: ActivityId,
    pub label: String,
    pub place: String,
    pub desc: String,
    pub time: DateTime<Utc>,
    pub duration: TimeDelta,
    pub tags: Vec<Tag>,
}

/// Activity fields supplied by a caller. Tags are referenced by id and
/// resolved by the services before anything is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub label: String,
    pub place: String,
    pub desc: String,
    pub time: DateTime<Utc>,
    pub duration: TimeDelta,
    pub tag_ids: Vec<TagId>,
}

impl NewActivity {
    /// Lowercase the place and check every field, stopping at the first
    /// violation.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeDelta, TimeZone, Utc};
    /// use lifelog_backend::domain::{NewActivity, ValidationError};
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    /// let mut activity = NewActivity {
    ///     label: "Morning run".into(),
    ///     place: "Park".into(),
    ///     desc: String::new(),
    ///     time: now - TimeDelta::minutes(30),
    ///     duration: TimeDelta::minutes(45),
    ///     tag_ids: vec![],
    /// };
    /// assert_eq!(activity.validate(now), Err(ValidationError::TimeInFuture));
    /// ```
    pub fn validate(&mut self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        self.place = self.place.to_lowercase();
        check_len(
            &self.label,
            ACTIVITY_LABEL_MIN,
            ACTIVITY_LABEL_MAX,
            ValidationError::ActivityLabelLength,
        )?;
        check_len(
            &self.place,
            0,
            ACTIVITY_PLACE_MAX,
            ValidationError::ActivityPlaceLength,
        )?;
        check_len(
            &self.desc,
            0,
            ACTIVITY_DESC_MAX,
            ValidationError::ActivityDescLength,
        )?;
        if self.duration < TimeDelta::zero() {
            return Err(ValidationError::ActivityNegativeDuration);
        }
        match self.time.checked_add_signed(self.duration) {
            Some(end) if end <= now => Ok(()),
            _ => Err(ValidationError::TimeInFuture),
        }
    }

    /// Build the stored form once the id and tags are known.
    pub fn into_activity(self, id: ActivityId, tags: Vec<Tag>) -> Activity {
        Activity {
            id,
            label: self.label,
            place: self.place,
            desc: self.desc,
            time: self.time,
            duration: self.duration,
            tags,
        }
    }
}
