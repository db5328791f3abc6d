//! Event aggregate reads and writes.
//!
//! Reads use two-phase pagination: a narrow identifier query resolves the
//! page boundary before any join runs, so an event with many children still
//! counts as exactly one item toward the page size. Writes order their
//! statements inside one transaction because later steps consume the
//! identifier produced by earlier ones.

use jiff::Timestamp;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::cursor::{RowCursor, EVENT_JOIN_COLUMNS};
use crate::error::{DatabaseResultExt, Result, StoreError};
use crate::models::{Event, Page, Rsvp, RsvpStatus, ScheduleFilter};
use crate::query::{JoinKind, Query, QueryBuilder, SortOrder};

use super::{EventStore, WriteOutcome};

impl EventStore {
    /// Retrieves one page of events, optionally restricted by schedule.
    ///
    /// Returns `None` when nothing matches or the page lies past the end of
    /// the result (the two cases are indistinguishable by contract).
    pub fn get_events(&self, page: Page, schedule: ScheduleFilter) -> Result<Option<Vec<Event>>> {
        let conn = self.acquire()?;

        let mut builder = QueryBuilder::select("events", &["id"]);
        if let Some(predicate) = schedule.predicate() {
            builder = builder.filter(predicate, Vec::new());
        }
        let id_query = builder.order_by("id", SortOrder::Ascending).build();

        let ids = page_of_ids(&conn, &id_query, page)?;
        if ids.is_empty() {
            return Ok(None);
        }

        let events = hydrate_events(&conn, &ids)?;
        Ok((!events.is_empty()).then_some(events))
    }

    /// Retrieves one page of the events whose identifiers appear in `ids`.
    pub fn get_events_with_ids(&self, ids: &[i64], page: Page) -> Result<Option<Vec<Event>>> {
        if ids.is_empty() {
            return Ok(None);
        }

        let conn = self.acquire()?;

        let id_query = QueryBuilder::select("events", &["id"])
            .filter_in("id", ids.iter().copied().map(Value::from).collect())
            .order_by("id", SortOrder::Ascending)
            .build();

        let page_ids = page_of_ids(&conn, &id_query, page)?;
        if page_ids.is_empty() {
            return Ok(None);
        }

        let events = hydrate_events(&conn, &page_ids)?;
        Ok((!events.is_empty()).then_some(events))
    }

    /// Persists a new event aggregate and returns it with its store-assigned
    /// identifier and timestamps.
    ///
    /// RSVPs supplied at creation time always start pending with an empty
    /// comment, whatever the caller put in them. Any failing statement rolls
    /// the whole aggregate back; no orphaned rows survive.
    pub fn create_event(&self, event: &Event) -> Result<Event> {
        let mut created: Option<Event> = None;

        self.write_tx("create event", |tx| {
            let now = Timestamp::now();
            let mut builder = QueryBuilder::insert("events");
            for (column, value) in event.to_row() {
                builder = builder.value(column, value);
            }
            let insert_event = builder
                .value("created_at", now.to_string())
                .value("updated_at", now.to_string())
                .build();

            let affected = execute(tx, &insert_event, "Failed to insert event")?;
            if affected < 1 {
                return Err(StoreError::WriteConflict {
                    operation: "create event",
                    reason: "event row was not inserted".to_string(),
                });
            }

            let event_id = tx.last_insert_rowid();

            for &activity_id in &event.activities {
                insert_activity(tx, event_id, activity_id)?;
            }

            let mut stored_rsvps = Vec::with_capacity(event.rsvps.len());
            for rsvp in &event.rsvps {
                // Creation-time RSVPs always start pending with no comment.
                let insert_rsvp = QueryBuilder::insert("rsvps")
                    .value("user_id", rsvp.user_id.clone())
                    .value("event_id", event_id)
                    .value("accepted", RsvpStatus::Pending.as_i64())
                    .value("comment", String::new())
                    .build();

                let affected = execute(tx, &insert_rsvp, "Failed to insert rsvp")?;
                if affected < 1 {
                    return Err(StoreError::WriteConflict {
                        operation: "create event",
                        reason: format!("rsvp for user {} was not inserted", rsvp.user_id),
                    });
                }

                stored_rsvps.push(Rsvp {
                    id: Some(tx.last_insert_rowid()),
                    event_id: Some(event_id),
                    user_id: rsvp.user_id.clone(),
                    status: RsvpStatus::Pending,
                    comment: String::new(),
                });
            }

            created = Some(Event {
                id: Some(event_id),
                activities: event.activities.clone(),
                rsvps: stored_rsvps,
                created_at: Some(now),
                updated_at: Some(now),
                ..event.clone()
            });
            Ok(WriteOutcome::Committed)
        })?;

        created.ok_or_else(|| StoreError::WriteConflict {
            operation: "create event",
            reason: "transaction committed without a stored aggregate".to_string(),
        })
    }

    /// Updates an event's root fields and fully replaces its activity set.
    ///
    /// The supplied activity list becomes the complete association; nothing
    /// is diffed. Returns `NotFound` (rolled back) when the identifier does
    /// not exist.
    pub fn update_event(&self, event: &Event) -> Result<WriteOutcome> {
        let event_id = event.require_id()?;

        self.write_tx("update event", |tx| {
            let mut builder = QueryBuilder::update("events");
            for (column, value) in event.to_row() {
                builder = builder.value(column, value);
            }
            let update_event = builder
                .value("updated_at", Timestamp::now().to_string())
                .filter("id = ?", vec![Value::from(event_id)])
                .build();

            let affected = execute(tx, &update_event, "Failed to update event")?;
            if affected < 1 {
                return Ok(WriteOutcome::NotFound);
            }

            let delete_activities = QueryBuilder::delete("event_activities")
                .filter("event_id = ?", vec![Value::from(event_id)])
                .build();
            execute(tx, &delete_activities, "Failed to delete existing activities")?;

            for &activity_id in &event.activities {
                insert_activity(tx, event_id, activity_id)?;
            }

            Ok(WriteOutcome::Committed)
        })
    }

    /// Deletes an event and cascades to its junction and RSVP rows.
    ///
    /// The RSVP deletion is not checked for affected rows; an event without
    /// RSVPs is legal. Returns `NotFound` when the identifier does not exist.
    pub fn delete_event(&self, id: i64) -> Result<WriteOutcome> {
        self.write_tx("delete event", |tx| {
            let delete_event = QueryBuilder::delete("events")
                .filter("id = ?", vec![Value::from(id)])
                .build();
            let affected = execute(tx, &delete_event, "Failed to delete event")?;
            if affected < 1 {
                return Ok(WriteOutcome::NotFound);
            }

            let delete_activities = QueryBuilder::delete("event_activities")
                .filter("event_id = ?", vec![Value::from(id)])
                .build();
            execute(tx, &delete_activities, "Failed to delete event activities")?;

            let delete_rsvps = QueryBuilder::delete("rsvps")
                .filter("event_id = ?", vec![Value::from(id)])
                .build();
            execute(tx, &delete_rsvps, "Failed to delete event rsvps")?;

            Ok(WriteOutcome::Committed)
        })
    }
}

/// Executes a rendered statement and reports the affected-row count.
pub(super) fn execute(conn: &Connection, query: &Query, context: &str) -> Result<usize> {
    conn.execute(&query.sql, params_from_iter(query.params.iter()))
        .db_context(context)
}

fn insert_activity(conn: &Connection, event_id: i64, activity_id: i64) -> Result<()> {
    let insert = QueryBuilder::insert("event_activities")
        .value("activity_id", activity_id)
        .value("event_id", event_id)
        .build();

    let affected = execute(conn, &insert, "Failed to insert event activity")?;
    if affected < 1 {
        return Err(StoreError::WriteConflict {
            operation: "insert event activity",
            reason: format!("activity {activity_id} was not linked to event {event_id}"),
        });
    }
    Ok(())
}

/// Phase one of a paginated read: resolve the page's identifier set from a
/// narrow id-only query by moving the cursor, not by slicing in memory.
pub(super) fn page_of_ids(conn: &Connection, query: &Query, page: Page) -> Result<Vec<i64>> {
    let mut stmt = conn
        .prepare(&query.sql)
        .db_context("Failed to prepare id query")?;
    let rows = stmt
        .query(params_from_iter(query.params.iter()))
        .db_context("Failed to run id query")?;

    let mut cursor = RowCursor::new(rows);
    cursor.seek(page.offset())?;
    cursor.take_ids(page.size() as usize)
}

/// Phase two: join child tables for exactly the resolved identifiers and fold
/// the multiplied rows back into one aggregate per id.
fn hydrate_events(conn: &Connection, ids: &[i64]) -> Result<Vec<Event>> {
    let query = QueryBuilder::select("events", EVENT_JOIN_COLUMNS)
        .join(
            JoinKind::Left,
            "event_activities",
            "events.id",
            "event_activities.event_id",
        )
        .join(JoinKind::Left, "rsvps", "events.id", "rsvps.event_id")
        .filter_in("events.id", ids.iter().copied().map(Value::from).collect())
        .order_by("events.id", SortOrder::Ascending)
        .build();

    let mut stmt = conn
        .prepare(&query.sql)
        .db_context("Failed to prepare event hydration query")?;
    let rows = stmt
        .query(params_from_iter(query.params.iter()))
        .db_context("Failed to run event hydration query")?;

    let events = RowCursor::new(rows).take_events(ids.len());
    events
}
