//! Subcommands and their handlers.
//!
//! Handlers return the text to print so `main` stays the only place that
//! writes to the terminal.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use tracing::info;

use crate::api::{
    Activity, ActivityRequest, Deleted, Expense, ExpenseRequest, Tag, TagRequest,
};
use crate::client::{ApiClient, ClientError};
use crate::prompt::{Prompter, flag_or_prompt, password};
use crate::render;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to read input: {0}")]
    Input(#[from] io::Error),
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with the server password and cache the tokens.
    Login,
    /// Forget the cached tokens.
    Logout,
    /// Manage tags.
    #[command(subcommand)]
    Tags(TagsCommand),
    /// Manage activities.
    #[command(subcommand)]
    Activities(ActivitiesCommand),
    /// Manage expenses.
    #[command(subcommand)]
    Expenses(ExpensesCommand),
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List every tag.
    List,
    /// Create a tag.
    Add { name: Option<String> },
    /// Rename a tag.
    Edit { id: i64, name: Option<String> },
    /// Delete an unused tag.
    Delete { id: i64 },
    /// Expenses carrying a tag.
    Expenses { id: i64 },
    /// Activities carrying a tag.
    Activities { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ActivitiesCommand {
    /// Activities since a day, newest first.
    List(SinceArgs),
    /// Show one activity.
    Show { id: i64 },
    /// Log an activity.
    Add(ActivityArgs),
    /// Replace an activity. Fields not given keep their current value.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ActivityArgs,
    },
    /// Delete an activity without expenses.
    Delete { id: i64 },
    /// Expenses linked to an activity.
    Expenses { id: i64 },
    /// Delete every expense linked to an activity.
    ClearExpenses { id: i64 },
}

#[derive(Debug, Subcommand)]
pub enum ExpensesCommand {
    /// Expenses since a day, newest first.
    List(SinceArgs),
    /// Show one expense.
    Show { id: i64 },
    /// Record an expense.
    Add(ExpenseArgs),
    /// Replace an expense. Fields not given keep their current value.
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ExpenseArgs,
    },
    /// Delete an expense.
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct SinceArgs {
    /// First day to include, formatted MM-DD-YYYY. Defaults to three
    /// months ago.
    #[arg(long, value_name = "MM-DD-YYYY")]
    pub from: Option<String>,
}

#[derive(Debug, Default, Args)]
pub struct ActivityArgs {
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long)]
    pub place: Option<String>,
    #[arg(long)]
    pub desc: Option<String>,
    /// Start time, RFC 3339.
    #[arg(long)]
    pub time: Option<DateTime<Utc>>,
    #[arg(long = "duration-secs", value_name = "SECONDS")]
    pub duration_secs: Option<i64>,
    /// Tag ids, comma separated or repeated.
    #[arg(long = "tag", value_delimiter = ',', value_name = "ID")]
    pub tags: Vec<i64>,
    /// Drop every tag.
    #[arg(long, conflicts_with = "tags")]
    pub no_tags: bool,
}

#[derive(Debug, Default, Args)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub label: Option<String>,
    /// Time of the expense, RFC 3339.
    #[arg(long)]
    pub time: Option<DateTime<Utc>>,
    #[arg(long)]
    pub value: Option<f64>,
    #[arg(long)]
    pub unit: Option<String>,
    /// Linked activity id.
    #[arg(long, value_name = "ID")]
    pub activity: Option<i64>,
    /// Unlink the activity.
    #[arg(long, conflicts_with = "activity")]
    pub no_activity: bool,
    /// Tag ids, comma separated or repeated.
    #[arg(long = "tag", value_delimiter = ',', value_name = "ID")]
    pub tags: Vec<i64>,
    /// Drop every tag.
    #[arg(long, conflicts_with = "tags")]
    pub no_tags: bool,
}

fn tag_ids(flags: Vec<i64>, clear: bool, current: &[Tag]) -> Vec<i64> {
    if clear || !flags.is_empty() {
        return flags;
    }
    current.iter().map(|tag| tag.id).collect()
}

/// Build an activity body from flags, prompting for missing required
/// fields. `current` supplies defaults when editing.
pub fn activity_request<R: BufRead, W: Write>(
    args: ActivityArgs,
    current: Option<&Activity>,
    prompter: &mut Prompter<R, W>,
) -> io::Result<ActivityRequest> {
    let label = flag_or_prompt(args.label, prompter, "label", current.map(|a| &a.label))?;
    let time = flag_or_prompt(args.time, prompter, "time (RFC 3339)", current.map(|a| &a.time))?;
    let duration_secs = flag_or_prompt(
        args.duration_secs,
        prompter,
        "duration in seconds",
        current.map(|a| &a.duration_secs),
    )?;
    Ok(ActivityRequest {
        label,
        place: args
            .place
            .or_else(|| current.map(|a| a.place.clone()))
            .unwrap_or_default(),
        desc: args
            .desc
            .or_else(|| current.map(|a| a.desc.clone()))
            .unwrap_or_default(),
        time,
        duration_secs,
        tag_ids: tag_ids(
            args.tags,
            args.no_tags,
            current.map(|a| a.tags.as_slice()).unwrap_or_default(),
        ),
    })
}

/// Build an expense body from flags, prompting for missing required fields.
pub fn expense_request<R: BufRead, W: Write>(
    args: ExpenseArgs,
    current: Option<&Expense>,
    prompter: &mut Prompter<R, W>,
) -> io::Result<ExpenseRequest> {
    let label = flag_or_prompt(args.label, prompter, "label", current.map(|e| &e.label))?;
    let time = flag_or_prompt(args.time, prompter, "time (RFC 3339)", current.map(|e| &e.time))?;
    let value = flag_or_prompt(args.value, prompter, "value", current.map(|e| &e.value))?;
    let unit = flag_or_prompt(args.unit, prompter, "unit", current.map(|e| &e.unit))?;
    let activity_id = if args.no_activity {
        None
    } else {
        args.activity.or_else(|| current.and_then(|e| e.activity_id))
    };
    Ok(ExpenseRequest {
        label,
        time,
        value,
        unit,
        activity_id,
        tag_ids: tag_ids(
            args.tags,
            args.no_tags,
            current.map(|e| e.tags.as_slice()).unwrap_or_default(),
        ),
    })
}

/// Run `command` and return what to print.
pub async fn run<R: BufRead, W: Write>(
    command: Command,
    client: &ApiClient,
    prompter: &mut Prompter<R, W>,
) -> Result<String, CommandError> {
    match command {
        Command::Login => {
            let secret = password("password")?;
            client.login(&secret).await?;
            info!("logged in");
            Ok("Logged in.".to_owned())
        }
        Command::Logout => Ok(if client.logout()? {
            "Logged out.".to_owned()
        } else {
            "Not logged in.".to_owned()
        }),
        Command::Tags(command) => run_tags(command, client, prompter).await,
        Command::Activities(command) => run_activities(command, client, prompter).await,
        Command::Expenses(command) => run_expenses(command, client, prompter).await,
    }
}

async fn run_tags<R: BufRead, W: Write>(
    command: TagsCommand,
    client: &ApiClient,
    prompter: &mut Prompter<R, W>,
) -> Result<String, CommandError> {
    let output = match command {
        TagsCommand::List => render::tags(&client.get::<Vec<Tag>>("tags").await?),
        TagsCommand::Add { name } => {
            let name = flag_or_prompt(name, prompter, "name", None)?;
            let tag: Tag = client.post("tags", &TagRequest { name }).await?;
            render::tags(&[tag])
        }
        TagsCommand::Edit { id, name } => {
            let name = match name {
                Some(name) => name,
                None => {
                    let tags: Vec<Tag> = client.get("tags").await?;
                    new_tag_name(id, &tags, prompter)?
                }
            };
            let tag: Tag = client.put(&format!("tags/{id}"), &TagRequest { name }).await?;
            render::tags(&[tag])
        }
        TagsCommand::Delete { id } => {
            client.delete(&format!("tags/{id}")).await?;
            format!("Deleted tag {id}.")
        }
        TagsCommand::Expenses { id } => {
            render::expenses(&client.get::<Vec<Expense>>(&format!("tags/{id}/expenses")).await?)
        }
        TagsCommand::Activities { id } => render::activities(
            &client
                .get::<Vec<Activity>>(&format!("tags/{id}/activities"))
                .await?,
        ),
    };
    Ok(output)
}

/// Prompt for a tag's new name, offering its current name as the default.
fn new_tag_name<R: BufRead, W: Write>(
    id: i64,
    tags: &[Tag],
    prompter: &mut Prompter<R, W>,
) -> io::Result<String> {
    let current = tags.iter().find(|tag| tag.id == id).map(|tag| &tag.name);
    prompter.value("new name", current)
}

async fn run_activities<R: BufRead, W: Write>(
    command: ActivitiesCommand,
    client: &ApiClient,
    prompter: &mut Prompter<R, W>,
) -> Result<String, CommandError> {
    let output = match command {
        ActivitiesCommand::List(since) => render::activities(
            &client
                .get_since::<Vec<Activity>>("activities", since.from.as_deref())
                .await?,
        ),
        ActivitiesCommand::Show { id } => {
            render::activities(&[client.get::<Activity>(&format!("activities/{id}")).await?])
        }
        ActivitiesCommand::Add(fields) => {
            let body = activity_request(fields, None, prompter)?;
            let created: Activity = client.post("activities", &body).await?;
            render::activities(&[created])
        }
        ActivitiesCommand::Edit { id, fields } => {
            let path = format!("activities/{id}");
            let current: Activity = client.get(&path).await?;
            let body = activity_request(fields, Some(&current), prompter)?;
            let updated: Activity = client.put(&path, &body).await?;
            render::activities(&[updated])
        }
        ActivitiesCommand::Delete { id } => {
            client.delete(&format!("activities/{id}")).await?;
            format!("Deleted activity {id}.")
        }
        ActivitiesCommand::Expenses { id } => render::expenses(
            &client
                .get::<Vec<Expense>>(&format!("activities/{id}/expenses"))
                .await?,
        ),
        ActivitiesCommand::ClearExpenses { id } => {
            let Deleted { deleted } = client
                .delete_json(&format!("activities/{id}/expenses"))
                .await?;
            format!("Deleted {deleted} expense(s) of activity {id}.")
        }
    };
    Ok(output)
}

async fn run_expenses<R: BufRead, W: Write>(
    command: ExpensesCommand,
    client: &ApiClient,
    prompter: &mut Prompter<R, W>,
) -> Result<String, CommandError> {
    let output = match command {
        ExpensesCommand::List(since) => render::expenses(
            &client
                .get_since::<Vec<Expense>>("expenses", since.from.as_deref())
                .await?,
        ),
        ExpensesCommand::Show { id } => {
            render::expenses(&[client.get::<Expense>(&format!("expenses/{id}")).await?])
        }
        ExpensesCommand::Add(fields) => {
            let body = expense_request(fields, None, prompter)?;
            let created: Expense = client.post("expenses", &body).await?;
            render::expenses(&[created])
        }
        ExpensesCommand::Edit { id, fields } => {
            let path = format!("expenses/{id}");
            let current: Expense = client.get(&path).await?;
            let body = expense_request(fields, Some(&current), prompter)?;
            let updated: Expense = client.put(&path, &body).await?;
            render::expenses(&[updated])
        }
        ExpensesCommand::Delete { id } => {
            client.delete(&format!("expenses/{id}")).await?;
            format!("Deleted expense {id}.")
        }
    };
    Ok(output)
}
