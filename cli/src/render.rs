//! Table rendering for command output.

use chrono::{DateTime, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::api::{Activity, Expense, Tag};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
}

#[derive(Tabled)]
struct ActivityRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Place")]
    place: String,
    #[tabled(rename = "Description")]
    desc: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Activity")]
    activity: String,
    #[tabled(rename = "Tags")]
    tags: String,
}

fn time(value: &DateTime<Utc>) -> String {
    value.format(TIME_FORMAT).to_string()
}

fn tag_names(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `1h 05m`, `12m 30s` or `45s`.
fn duration(secs: i64) -> String {
    let (hours, rest) = (secs / 3600, secs % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    match (hours, minutes, seconds) {
        (0, 0, s) => format!("{s}s"),
        (0, m, 0) => format!("{m}m"),
        (0, m, s) => format!("{m}m {s:02}s"),
        (h, m, _) => format!("{h}h {m:02}m"),
    }
}

fn table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_owned();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn tags(tags: &[Tag]) -> String {
    let rows = tags
        .iter()
        .map(|tag| TagRow {
            id: tag.id,
            name: tag.name.clone(),
        })
        .collect();
    table(rows, "No tags.")
}

pub fn activities(activities: &[Activity]) -> String {
    let rows = activities
        .iter()
        .map(|activity| ActivityRow {
            id: activity.id,
            time: time(&activity.time),
            duration: duration(activity.duration_secs),
            label: activity.label.clone(),
            place: activity.place.clone(),
            desc: activity.desc.clone(),
            tags: tag_names(&activity.tags),
        })
        .collect();
    table(rows, "No activities.")
}

pub fn expenses(expenses: &[Expense]) -> String {
    let rows = expenses
        .iter()
        .map(|expense| ExpenseRow {
            id: expense.id,
            time: time(&expense.time),
            label: expense.label.clone(),
            amount: format!("{:.2} {}", expense.value, expense.unit),
            activity: expense
                .activity_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            tags: tag_names(&expense.tags),
        })
        .collect();
    table(rows, "No expenses.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case(45, "45s")]
    #[case(600, "10m")]
    #[case(750, "12m 30s")]
    #[case(3900, "1h 05m")]
    fn formats_durations(#[case] secs: i64, #[case] expected: &str) {
        assert_eq!(duration(secs), expected);
    }

    #[rstest]
    fn empty_lists_say_so() {
        assert_eq!(tags(&[]), "No tags.");
        assert_eq!(activities(&[]), "No activities.");
        assert_eq!(expenses(&[]), "No expenses.");
    }

    #[rstest]
    fn expense_rows_show_amount_activity_and_tags() {
        let expense = Expense {
            id: 7,
            label: "Coffee".to_owned(),
            time: Utc
                .with_ymd_and_hms(2024, 6, 15, 8, 0, 0)
                .single()
                .expect("valid time"),
            value: 3.5,
            unit: "eur".to_owned(),
            activity_id: Some(2),
            tags: vec![
                Tag {
                    id: 1,
                    name: "food".to_owned(),
                },
                Tag {
                    id: 4,
                    name: "treat".to_owned(),
                },
            ],
        };

        let rendered = expenses(&[expense]);

        for expected in ["Coffee", "3.50 eur", "2024-06-15 08:00", "food, treat"] {
            assert!(rendered.contains(expected), "missing {expected}:\n{rendered}");
        }
    }
}
