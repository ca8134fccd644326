//! Database operations for diary entries.
//!
//! This module provides SQLite storage for diary entries, their tags and a
//! full-text index over entry content. It uses connection pooling via r2d2 so
//! that independent requests can run concurrently.
//!
//! # Module Structure
//!
//! - `schema`: Table definitions and schema initialization
//! - `entries`: Owner-scoped entry CRUD, listing and full-text search
//! - `stats`: Tag statistics, writing frequency and on-this-day aggregations
//! - `store`: The `DiaryStore` contract and its SQLite implementation
//!
//! # Example
//!
//! ```no_run
//! use daybook::db::Database;
//! use std::path::Path;
//!
//! let db = Database::open(Path::new("/tmp/daybook.db"))?;
//! db.initialize_schema()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod entries;
pub mod schema;
pub mod stats;
pub mod store;

pub use store::{DiaryStore, SqliteStore};

use crate::constants::{DB_BUSY_TIMEOUT_MS, DB_POOL_MAX_SIZE};
use crate::errors::{AppResult, DatabaseError};
use r2d2::{Builder, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Type alias for a pooled SQLite connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Database handle with connection pooling.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates a SQLite database file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database file cannot be opened
    /// - Connection pool cannot be initialized
    pub fn open(db_path: &Path) -> AppResult<Self> {
        debug!("Opening database at: {:?}", db_path);

        let manager = SqliteConnectionManager::file(db_path);
        let db = Self::with_builder(manager, Pool::builder().max_size(DB_POOL_MAX_SIZE))?;

        info!("Database opened successfully");
        Ok(db)
    }

    /// Opens a private in-memory database.
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// limited to a single connection that is never retired.
    pub fn open_in_memory() -> AppResult<Self> {
        debug!("Opening in-memory database");
        let builder = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None);
        Self::with_builder(SqliteConnectionManager::memory(), builder)
    }

    fn with_builder(
        manager: SqliteConnectionManager,
        builder: Builder<SqliteConnectionManager>,
    ) -> AppResult<Self> {
        let pool = builder
            .connection_customizer(Box::new(ConnectionPragmas {
                busy_timeout: Duration::from_millis(DB_BUSY_TIMEOUT_MS),
            }))
            .build(manager)
            .map_err(DatabaseError::Pool)?;

        // Test the connection
        let conn = pool.get().map_err(DatabaseError::Pool)?;
        conn.execute_batch("SELECT 1").map_err(DatabaseError::Sqlite)?;
        drop(conn);

        Ok(Database { pool })
    }

    /// Gets a connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection is available or the pool is exhausted.
    pub fn get_conn(&self) -> AppResult<PooledConnection> {
        self.pool
            .get()
            .map_err(|e| DatabaseError::Pool(e).into())
    }

    /// Initializes the database schema.
    ///
    /// Creates all necessary tables and indexes if they don't exist.
    /// This is idempotent and safe to call multiple times.
    pub fn initialize_schema(&self) -> AppResult<()> {
        let conn = self.get_conn()?;
        schema::create_tables(&conn)?;
        info!("Database schema initialized");
        Ok(())
    }
}

/// Connection customizer applying per-connection pragmas.
#[derive(Debug)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl r2d2::CustomizeConnection<Connection, rusqlite::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        // Tag rows cascade on entry deletion
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(())
    }

    fn on_release(&self, _conn: Connection) {}
}
