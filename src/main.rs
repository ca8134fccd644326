/*!
# Daybook - A Personal Diary

Daybook keeps diary entries in a local SQLite database. Entries are tagged with
`#hashtags`, searchable by full text and summarised by tag and writing
frequency.

## Usage

```text
daybook [--user <ID>] <COMMAND>

Commands:
  new          Writes a new entry
  show         Shows one entry
  list         Lists entries, newest first
  edit         Changes an entry's content, date or tags
  delete       Deletes an entry permanently
  search       Full-text search, most relevant first
  tags         Lists every tag in use
  tagged       Lists entries carrying any of the comma-separated tags
  tag-stats    Shows how often each tag is used
  frequency    Counts entries per day, week or month
  on-this-day  Entries written on this month and day in other years
```

Results are printed to stdout as pretty JSON; logs go to stderr.

## Configuration

- `DAYBOOK_DB`: Database file (defaults to `~/.local/share/daybook/daybook.db`)
- `DAYBOOK_USER` or `USER`: Owner id when `--user` is absent
- `DAYBOOK_LOG_FORMAT`: `text` or `json`
- `DAYBOOK_LOG_LEVEL` or `RUST_LOG`: Log filter
*/

use chrono::Local;
use clap::Parser;
use daybook::cli::{self, CliArgs};
use daybook::config::{Config, LogFormat};
use daybook::db::{Database, SqliteStore};
use daybook::errors::AppResult;
use daybook::ops::DiaryService;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format, &config.log_level);

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides `default_level`.
fn init_tracing(format: LogFormat, default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// The main application flow:
/// 1. Parses and validates command-line arguments
/// 2. Validates configuration and resolves the owner
/// 3. Opens the database and ensures the schema exists
/// 4. Runs the command and prints its result
fn run(mut config: Config) -> AppResult<()> {
    let args = CliArgs::parse();
    debug!("CLI arguments: {:?}", args);

    if let Some(user) = args.user.clone() {
        config.owner_id = user;
    }
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let command = args.into_command()?;

    config.ensure_db_dir()?;
    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    let service = DiaryService::new(SqliteStore::new(db));
    let today = Local::now().date_naive();
    let output = cli::execute(&service, &config.owner_id, command, today)?;

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    println!("{}", rendered);

    info!("Command completed for owner {}", config.owner_id);
    Ok(())
}
