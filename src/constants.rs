//! Constants used throughout the application.
//!
//! This module contains all constants used in the Daybook application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A personal diary with tags, search and writing statistics";

// Configuration Keys & Environment Variables
/// Environment variable for the SQLite database path.
pub const ENV_VAR_DAYBOOK_DB: &str = "DAYBOOK_DB";
/// Environment variable for the owner id used when `--user` is absent.
pub const ENV_VAR_DAYBOOK_USER: &str = "DAYBOOK_USER";
/// Environment variable selecting the log output format.
pub const ENV_VAR_DAYBOOK_LOG_FORMAT: &str = "DAYBOOK_LOG_FORMAT";
/// Environment variable selecting the default log level.
pub const ENV_VAR_DAYBOOK_LOG_LEVEL: &str = "DAYBOOK_LOG_LEVEL";
/// Standard environment variable for the login name.
pub const ENV_VAR_USER: &str = "USER";
/// Default database location, expanded with `shellexpand`.
pub const DEFAULT_DB_PATH: &str = "~/.local/share/daybook/daybook.db";
/// Owner id used when neither `DAYBOOK_USER` nor `USER` is set.
pub const DEFAULT_OWNER_ID: &str = "default";
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Logging Configuration
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Date format string for compact date format (YYYYMMDD).
pub const DATE_FORMAT_COMPACT: &str = "%Y%m%d";
/// Bucket key format for monthly grouping.
pub const DATE_FORMAT_MONTH: &str = "%Y-%m";
/// Width of the sliding window a diary date must fall into, either side of today.
pub const DIARY_DATE_WINDOW_MONTHS: u32 = 12;

// Text Processing
/// Default maximum excerpt length, in characters.
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;
/// Marker appended to truncated excerpts.
pub const EXCERPT_ELLIPSIS: &str = "...";

// Pagination
/// Page used when none is supplied.
pub const DEFAULT_PAGE: i64 = 1;
/// Page size used when none is supplied.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;
/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

// Database
/// Maximum number of pooled SQLite connections.
pub const DB_POOL_MAX_SIZE: u32 = 5;
/// Milliseconds a connection waits on a locked database before failing.
pub const DB_BUSY_TIMEOUT_MS: u64 = 5_000;
