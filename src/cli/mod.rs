//! Command-line interface.
//!
//! Arguments are parsed by clap as raw strings and then checked by
//! [`CliArgs::into_command`], which produces a typed [`DiaryCommand`]. Only
//! validated commands reach the diary engine.

use crate::constants::{APP_DESCRIPTION, APP_NAME, DATE_FORMAT_COMPACT};
use crate::db::DiaryStore;
use crate::diary_core::dates::Granularity;
use crate::errors::{AppError, AppResult};
use crate::models::EntryPatch;
use crate::ops::DiaryService;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::str::FromStr;
use uuid::Uuid;

/// A personal diary with tags, search and writing statistics
#[derive(Parser, Debug)]
#[command(name = APP_NAME, about = APP_DESCRIPTION)]
#[command(author, version, long_about = None)]
pub struct CliArgs {
    /// Owner id to act as (defaults to DAYBOOK_USER, then USER)
    #[arg(short = 'u', long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands as typed on the command line.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Writes a new entry
    New {
        /// Entry text; #hashtags become tags
        content: String,
        /// Diary date (YYYY-MM-DD or YYYYMMDD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Extra tag, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Shows one entry
    Show { id: String },
    /// Lists entries, newest first
    List {
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Changes an entry's content, date or tags
    Edit {
        id: String,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// Replacement tag, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Deletes an entry permanently
    Delete { id: String },
    /// Full-text search, most relevant first
    Search {
        query: String,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Lists every tag in use
    Tags,
    /// Lists entries carrying any of the comma-separated tags
    Tagged {
        tags: String,
        #[arg(long)]
        page: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Shows how often each tag is used
    TagStats,
    /// Counts entries per day, week or month
    Frequency {
        /// Range start, defaults to January 1st of this year
        #[arg(long)]
        from: Option<String>,
        /// Range end, defaults to today
        #[arg(long)]
        to: Option<String>,
        /// daily, weekly or monthly
        #[arg(short, long)]
        granularity: Option<String>,
    },
    /// Entries written on this month and day in other years
    OnThisDay {
        #[arg(short, long)]
        date: Option<String>,
    },
}

/// A validated command, ready for the diary engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DiaryCommand {
    Create {
        content: String,
        date: Option<NaiveDate>,
        tags: Vec<String>,
    },
    Get(Uuid),
    List {
        page: Option<i64>,
        limit: Option<i64>,
    },
    Update {
        id: Uuid,
        patch: EntryPatch,
    },
    Delete(Uuid),
    Search {
        query: String,
        page: Option<i64>,
        limit: Option<i64>,
    },
    DistinctTags,
    ListByTags {
        tags_csv: String,
        page: Option<i64>,
        limit: Option<i64>,
    },
    TagStats,
    WritingFrequency {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        granularity: Option<Granularity>,
    },
    OnThisDay(Option<NaiveDate>),
}

impl CliArgs {
    /// Validates raw arguments into a typed command.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for malformed dates, ids or granularity.
    pub fn into_command(self) -> AppResult<DiaryCommand> {
        let command = match self.command {
            Commands::New {
                content,
                date,
                tags,
            } => DiaryCommand::Create {
                content,
                date: parse_optional_date(date.as_deref())?,
                tags,
            },
            Commands::Show { id } => DiaryCommand::Get(parse_id(&id)?),
            Commands::List { page, limit } => DiaryCommand::List { page, limit },
            Commands::Edit {
                id,
                content,
                date,
                tags,
            } => DiaryCommand::Update {
                id: parse_id(&id)?,
                patch: EntryPatch {
                    content,
                    date: parse_optional_date(date.as_deref())?,
                    tags: (!tags.is_empty()).then_some(tags),
                },
            },
            Commands::Delete { id } => DiaryCommand::Delete(parse_id(&id)?),
            Commands::Search { query, page, limit } => DiaryCommand::Search { query, page, limit },
            Commands::Tags => DiaryCommand::DistinctTags,
            Commands::Tagged { tags, page, limit } => DiaryCommand::ListByTags {
                tags_csv: tags,
                page,
                limit,
            },
            Commands::TagStats => DiaryCommand::TagStats,
            Commands::Frequency {
                from,
                to,
                granularity,
            } => DiaryCommand::WritingFrequency {
                start: parse_optional_date(from.as_deref())?,
                end: parse_optional_date(to.as_deref())?,
                granularity: granularity
                    .as_deref()
                    .map(Granularity::from_str)
                    .transpose()?,
            },
            Commands::OnThisDay { date } => {
                DiaryCommand::OnThisDay(parse_optional_date(date.as_deref())?)
            }
        };
        Ok(command)
    }
}

/// Parses a date in `YYYY-MM-DD` or `YYYYMMDD` form.
///
/// # Examples
///
/// ```
/// use daybook::cli::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(parse_date("2024-01-15").unwrap(), expected);
/// assert_eq!(parse_date("20240115").unwrap(), expected);
/// assert!(parse_date("15/01/2024").is_err());
/// ```
pub fn parse_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::from_str(raw)
        .or_else(|_| NaiveDate::parse_from_str(raw, DATE_FORMAT_COMPACT))
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid date '{}'; expected YYYY-MM-DD or YYYYMMDD",
                raw
            ))
        })
}

fn parse_optional_date(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    raw.map(parse_date).transpose()
}

/// Parses an entry id.
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("Invalid entry id '{}'", raw)))
}

/// Runs a validated command and returns its JSON result.
///
/// `today` fills in the date of a new entry when none was given.
pub fn execute<S: DiaryStore>(
    service: &DiaryService<S>,
    owner_id: &str,
    command: DiaryCommand,
    today: NaiveDate,
) -> AppResult<Value> {
    let value = match command {
        DiaryCommand::Create {
            content,
            date,
            tags,
        } => to_json(service.create_entry(owner_id, &content, date.unwrap_or(today), &tags)?),
        DiaryCommand::Get(id) => to_json(service.get_entry(owner_id, id)?),
        DiaryCommand::List { page, limit } => to_json(service.list_entries(owner_id, page, limit)?),
        DiaryCommand::Update { id, patch } => to_json(service.update_entry(owner_id, id, patch)?),
        DiaryCommand::Delete(id) => {
            service.delete_entry(owner_id, id)?;
            json!({ "deleted": id })
        }
        DiaryCommand::Search { query, page, limit } => {
            to_json(service.search_entries(owner_id, &query, page, limit)?)
        }
        DiaryCommand::DistinctTags => to_json(service.get_distinct_tags(owner_id)?),
        DiaryCommand::ListByTags {
            tags_csv,
            page,
            limit,
        } => to_json(service.list_by_tags(owner_id, &tags_csv, page, limit)?),
        DiaryCommand::TagStats => to_json(service.get_tag_stats(owner_id)?),
        DiaryCommand::WritingFrequency {
            start,
            end,
            granularity,
        } => to_json(service.get_writing_frequency(owner_id, start, end, granularity)?),
        DiaryCommand::OnThisDay(date) => to_json(service.get_on_this_day(owner_id, date)?),
    };
    Ok(value)
}

fn to_json<T: serde::Serialize>(value: T) -> Value {
    // Plain data types with string keys always serialize
    serde_json::to_value(value).unwrap_or(Value::Null)
}
