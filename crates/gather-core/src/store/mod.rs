//! Event aggregate storage over a pooled SQLite database.
//!
//! [`EventStore`] is a blocking facade: every public operation acquires one
//! pooled connection for its full duration and releases it on every exit
//! path. Reads resolve a stable page of root identifiers before joining in
//! child rows; multi-statement writes run inside a single transaction that
//! either commits everything or rolls everything back.

use std::path::Path;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Transaction;

use crate::error::{DatabaseResultExt, PoolResultExt, Result, StoreError};

pub mod event_queries;
pub mod geo;
pub mod rsvp_queries;

/// Outcome of a write operation that targets existing rows.
///
/// This is the tagged replacement for a bare success boolean: `NotFound`
/// means the target row did not exist and the transaction was rolled back,
/// while statement and pool failures surface as errors. Callers that only
/// care about a boolean use [`WriteOutcome::committed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// All statements applied and the transaction committed
    Committed,
    /// The targeted row was missing; nothing was applied
    NotFound,
}

impl WriteOutcome {
    /// Boolean projection of the outcome.
    pub fn committed(self) -> bool {
        matches!(self, WriteOutcome::Committed)
    }
}

/// Data accessor for the event aggregate.
///
/// Cheap to share by reference across request workers; the pool inside hands
/// out exclusive connections and bounds concurrency.
pub struct EventStore {
    pool: Pool<SqliteConnectionManager>,
}

impl EventStore {
    /// Opens the store at `path`, bounding the pool at `max_connections`, and
    /// initializes the schema.
    pub fn open<P: AsRef<Path>>(path: P, max_connections: u32) -> Result<Self> {
        if max_connections == 0 {
            return Err(StoreError::invalid_input(
                "max_connections",
                "the pool needs at least one connection",
            ));
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.busy_timeout(Duration::from_secs(5))?;
            geo::register_functions(conn)
        });

        let pool = Pool::builder()
            .max_size(max_connections)
            .build(manager)
            .pool_context("Failed to build connection pool")?;

        let store = Self { pool };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Applies the embedded schema. Idempotent.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.acquire()?;
        let schema_sql = include_str!("../../assets/schema.sql");
        conn.execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Probes the pool for a usable connection.
    pub fn is_connected(&self) -> bool {
        self.pool.get().is_ok()
    }

    /// Acquires one exclusive connection; may block until the pool has one.
    pub(crate) fn acquire(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .pool_context("Failed to acquire a connection")
    }

    /// Runs a multi-statement write inside one transaction on one connection.
    ///
    /// The closure reports `Committed` to commit, `NotFound` to abort because
    /// the target row is missing, or an error to abort outright. Both abort
    /// paths roll back explicitly; a rollback that itself fails is surfaced
    /// as [`StoreError::RollbackFailed`] rather than ignored.
    pub(crate) fn write_tx<F>(&self, operation: &'static str, f: F) -> Result<WriteOutcome>
    where
        F: FnOnce(&Transaction<'_>) -> Result<WriteOutcome>,
    {
        let mut conn = self.acquire()?;
        let tx = conn
            .transaction()
            .db_context("Failed to begin transaction")?;

        match f(&tx) {
            Ok(WriteOutcome::Committed) => {
                tx.commit().db_context("Failed to commit transaction")?;
                Ok(WriteOutcome::Committed)
            }
            Ok(outcome) => {
                log::warn!("{operation}: target row missing, rolling back");
                Self::rollback(tx, operation)?;
                Ok(outcome)
            }
            Err(err) => {
                log::error!("{operation} failed, rolling back: {err}");
                Self::rollback(tx, operation)?;
                Err(err)
            }
        }
    }

    fn rollback(tx: Transaction<'_>, operation: &'static str) -> Result<()> {
        tx.rollback().map_err(|source| {
            log::error!("{operation}: rollback failed: {source}");
            StoreError::RollbackFailed { operation, source }
        })
    }
}
