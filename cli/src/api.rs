//! JSON bodies exchanged with the lifelog server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub label: String,
    pub place: String,
    pub desc: String,
    pub time: DateTime<Utc>,
    pub duration_secs: i64,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub label: String,
    pub time: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub activity_id: Option<i64>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub label: String,
    pub place: String,
    pub desc: String,
    pub time: DateTime<Utc>,
    pub duration_secs: i64,
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub label: String,
    pub time: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<i64>,
    pub tag_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AccessToken {
    pub at: String,
}

#[derive(Debug, Deserialize)]
pub struct Deleted {
    pub deleted: u64,
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}
