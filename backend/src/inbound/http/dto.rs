//! Request and response bodies for the entity endpoints.
//!
//! Domain types stay free of serde and utoipa; these DTOs carry the JSON
//! shape and convert at the edge.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    Activity, ActivityId, Error, Expense, NewActivity, NewExpense, NewTag, Tag, TagId,
};
use crate::inbound::http::validation::{
    FieldName, optional_link, parse_rfc3339_timestamp, require,
};

const NAME: FieldName = FieldName::new("name");
const LABEL: FieldName = FieldName::new("label");
const TIME: FieldName = FieldName::new("time");
const DURATION: FieldName = FieldName::new("durationSecs");
const VALUE: FieldName = FieldName::new("value");
const UNIT: FieldName = FieldName::new("unit");
const ACTIVITY_ID: FieldName = FieldName::new("activityId");

/// Body of `POST /tags` and `PUT /tags/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    #[schema(example = "My-Tag")]
    pub name: Option<String>,
}

impl TryFrom<TagRequest> for NewTag {
    type Error = Error;

    fn try_from(value: TagRequest) -> Result<Self, Self::Error> {
        Ok(Self::new(require(value.name, NAME)?))
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i64,
    #[schema(example = "my-tag")]
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

fn tag_ids(values: Option<Vec<i64>>) -> Vec<TagId> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(TagId::new)
        .collect()
}

/// Body of `POST /activities` and `PUT /activities/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    #[schema(example = "Morning run")]
    pub label: Option<String>,
    #[schema(example = "Park")]
    pub place: Option<String>,
    pub desc: Option<String>,
    /// RFC 3339 start time.
    #[schema(example = "2024-06-15T07:30:00Z")]
    pub time: Option<String>,
    #[schema(example = 1800)]
    pub duration_secs: Option<i64>,
    pub tag_ids: Option<Vec<i64>>,
}

impl TryFrom<ActivityRequest> for NewActivity {
    type Error = Error;

    fn try_from(value: ActivityRequest) -> Result<Self, Self::Error> {
        let time = parse_rfc3339_timestamp(&require(value.time, TIME)?, TIME)?;
        let secs = require(value.duration_secs, DURATION)?;
        let duration = TimeDelta::try_seconds(secs).ok_or_else(|| {
            Error::invalid_request("durationSecs is out of range")
                .with_details(json!({ "field": "durationSecs", "value": secs }))
        })?;
        Ok(Self {
            label: require(value.label, LABEL)?,
            place: value.place.unwrap_or_default(),
            desc: value.desc.unwrap_or_default(),
            time,
            duration,
            tag_ids: tag_ids(value.tag_ids),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub id: i64,
    pub label: String,
    pub place: String,
    pub desc: String,
    pub time: DateTime<Utc>,
    pub duration_secs: i64,
    pub tags: Vec<TagResponse>,
}

impl From<Activity> for ActivityResponse {
    fn from(value: Activity) -> Self {
        Self {
            id: value.id.get(),
            label: value.label,
            place: value.place,
            desc: value.desc,
            time: value.time,
            duration_secs: value.duration.num_seconds(),
            tags: value.tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

/// Body of `POST /expenses` and `PUT /expenses/{id}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    #[schema(example = "Coffee")]
    pub label: Option<String>,
    /// RFC 3339 time the money was spent.
    #[schema(example = "2024-06-15T08:00:00Z")]
    pub time: Option<String>,
    #[schema(example = 3.5)]
    pub value: Option<f64>,
    #[schema(example = "EUR")]
    pub unit: Option<String>,
    /// Linked activity; absent or 0 means none.
    pub activity_id: Option<i64>,
    pub tag_ids: Option<Vec<i64>>,
}

impl TryFrom<ExpenseRequest> for NewExpense {
    type Error = Error;

    fn try_from(value: ExpenseRequest) -> Result<Self, Self::Error> {
        let time = parse_rfc3339_timestamp(&require(value.time, TIME)?, TIME)?;
        Ok(Self {
            label: require(value.label, LABEL)?,
            time,
            value: require(value.value, VALUE)?,
            unit: require(value.unit, UNIT)?,
            activity_id: optional_link(value.activity_id, ACTIVITY_ID)?.map(ActivityId::new),
            tag_ids: tag_ids(value.tag_ids),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: i64,
    pub label: String,
    pub time: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub activity_id: Option<i64>,
    pub tags: Vec<TagResponse>,
}

impl From<Expense> for ExpenseResponse {
    fn from(value: Expense) -> Self {
        Self {
            id: value.id.get(),
            label: value.label,
            time: value.time,
            value: value.value,
            unit: value.unit,
            activity_id: value.activity_id.map(ActivityId::get),
            tags: value.tags.into_iter().map(TagResponse::from).collect(),
        }
    }
}

/// Body of `DELETE /activities/{id}/expenses`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// Query string of the time-filtered listings.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FromQuery {
    /// First day to include, formatted MM-DD-YYYY. Defaults to three months
    /// ago.
    #[param(example = "06-01-2024")]
    pub from: Option<String>,
}
