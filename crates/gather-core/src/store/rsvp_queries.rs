//! RSVP reads and writes.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter};

use crate::cursor::RowCursor;
use crate::error::{DatabaseResultExt, Result, StoreError};
use crate::models::{Page, Rsvp};
use crate::query::{QueryBuilder, SortOrder};

use super::event_queries::execute;
use super::{EventStore, WriteOutcome};

const RSVP_COLUMNS: &[&str] = &["rsvp_id", "user_id", "event_id", "accepted", "comment"];

const CHECK_EVENT_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1)";

impl EventStore {
    /// Retrieves one page of RSVPs for an event, or `None` when there are
    /// none on that page.
    pub fn get_rsvps_for_event(&self, event_id: i64, page: Page) -> Result<Option<Vec<Rsvp>>> {
        let query = QueryBuilder::select("rsvps", RSVP_COLUMNS)
            .filter("event_id = ?", vec![Value::from(event_id)])
            .order_by("rsvp_id", SortOrder::Ascending)
            .build();

        self.rsvp_page(&query, page)
    }

    /// Retrieves one page of a user's RSVPs across all events.
    pub fn get_rsvps_for_user(&self, user_id: &str, page: Page) -> Result<Option<Vec<Rsvp>>> {
        let query = QueryBuilder::select("rsvps", RSVP_COLUMNS)
            .filter("user_id = ?", vec![Value::from(user_id.to_string())])
            .order_by("rsvp_id", SortOrder::Ascending)
            .build();

        self.rsvp_page(&query, page)
    }

    fn rsvp_page(&self, query: &crate::query::Query, page: Page) -> Result<Option<Vec<Rsvp>>> {
        let conn = self.acquire()?;
        let mut stmt = conn
            .prepare(&query.sql)
            .db_context("Failed to prepare rsvp query")?;
        let rows = stmt
            .query(params_from_iter(query.params.iter()))
            .db_context("Failed to run rsvp query")?;

        let mut cursor = RowCursor::new(rows);
        cursor.seek(page.offset())?;
        let rsvps = cursor.take_rsvps(page.size() as usize)?;

        Ok((!rsvps.is_empty()).then_some(rsvps))
    }

    /// Adds RSVPs to an existing event.
    ///
    /// Unlike creation-time RSVPs these are stored as supplied; the caller's
    /// acceptance state and comment are trusted. Returns `NotFound` (and
    /// inserts nothing) when the event does not exist.
    pub fn create_event_rsvps(&self, event_id: i64, rsvps: &[Rsvp]) -> Result<WriteOutcome> {
        self.write_tx("create event rsvps", |tx| {
            let exists: bool = tx
                .query_row(CHECK_EVENT_EXISTS_SQL, params![event_id], |row| row.get(0))
                .db_context("Failed to check event existence")?;
            if !exists {
                return Ok(WriteOutcome::NotFound);
            }

            for rsvp in rsvps {
                let insert = QueryBuilder::insert("rsvps")
                    .value("user_id", rsvp.user_id.clone())
                    .value("event_id", event_id)
                    .value("accepted", rsvp.status.as_i64())
                    .value("comment", rsvp.comment.clone())
                    .build();

                let affected = execute(tx, &insert, "Failed to insert rsvp")?;
                if affected < 1 {
                    return Err(StoreError::WriteConflict {
                        operation: "create event rsvps",
                        reason: format!("rsvp for user {} was not inserted", rsvp.user_id),
                    });
                }
            }

            Ok(WriteOutcome::Committed)
        })
    }

    /// Updates one RSVP, addressed by event identifier and RSVP identifier.
    ///
    /// A single statement, so no transaction is needed; success means at
    /// least one row was affected.
    pub fn update_event_rsvp(&self, event_id: i64, rsvp: &Rsvp) -> Result<WriteOutcome> {
        let rsvp_id = rsvp.id.ok_or_else(|| {
            StoreError::invalid_input("rsvp_id", "rsvp must carry a store-assigned identifier")
        })?;

        let query = QueryBuilder::update("rsvps")
            .value("user_id", rsvp.user_id.clone())
            .value("accepted", rsvp.status.as_i64())
            .value("comment", rsvp.comment.clone())
            .filter(
                "event_id = ? AND rsvp_id = ?",
                vec![Value::from(event_id), Value::from(rsvp_id)],
            )
            .build();

        let conn = self.acquire()?;
        let affected = execute(&conn, &query, "Failed to update rsvp")?;

        Ok(if affected > 0 {
            WriteOutcome::Committed
        } else {
            WriteOutcome::NotFound
        })
    }
}
