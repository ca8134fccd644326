/*!
# Daybook

Daybook is a personal diary engine. Entries carry a diary date, free-text
content and a tag set built from caller-supplied tags plus `#hashtags` found in
the content. Every operation is scoped to one owner.

## Core Features

- Create, read, update and delete entries, with a one-year date window
- Paged listing, newest first, with derived excerpts
- Full-text search ranked by relevance
- Tag listings and per-tag usage statistics
- Writing frequency by day, week or month
- "On this day" look-backs across previous years

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `diary_core`: Pure helpers for tags, excerpts, pagination and date buckets
- `db`: SQLite persistence behind the `DiaryStore` trait
- `ops`: The `DiaryService` query engine composing the above
- `cli`: Command-line parsing and input validation using clap
- `config`: Configuration loading and validation
- `errors`: Error handling infrastructure

## Usage Example

```rust,no_run
use daybook::db::{Database, SqliteStore};
use daybook::ops::DiaryService;
use daybook::Config;
use chrono::Local;

fn main() -> daybook::AppResult<()> {
    let config = Config::load()?;
    config.ensure_db_dir()?;

    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    let service = DiaryService::new(SqliteStore::new(db));
    let today = Local::now().date_naive();
    let entry = service.create_entry(&config.owner_id, "First page #start", today, &[])?;
    println!("{}", entry.excerpt);
    Ok(())
}
```
*/

/// Command-line interface for parsing and validating user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// SQLite persistence for diary entries
pub mod db;
/// Pure diary logic without I/O
pub mod diary_core;
/// Error types and utilities for error handling
pub mod errors;
/// Diary entry and aggregation data types
pub mod models;
/// The diary query engine
pub mod ops;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use models::{DiaryEntry, EntryView};
pub use ops::DiaryService;
