//! Shared fixtures for the service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{ActivityId, NewActivity, NewExpense, TagId};

pub(crate) fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

pub(crate) fn new_activity(label: &str, ago: TimeDelta, tag_ids: &[i64]) -> NewActivity {
    NewActivity {
        label: label.to_owned(),
        place: "Home".to_owned(),
        desc: String::new(),
        time: fixture_now() - ago,
        duration: TimeDelta::zero(),
        tag_ids: tag_ids.iter().copied().map(TagId::new).collect(),
    }
}

pub(crate) fn new_expense(
    label: &str,
    ago: TimeDelta,
    activity_id: Option<i64>,
    tag_ids: &[i64],
) -> NewExpense {
    NewExpense {
        label: label.to_owned(),
        time: fixture_now() - ago,
        value: 12.5,
        unit: "EUR".to_owned(),
        activity_id: activity_id.map(ActivityId::new),
        tag_ids: tag_ids.iter().copied().map(TagId::new).collect(),
    }
}
