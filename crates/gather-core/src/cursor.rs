//! Forward-only cursor over query results.
//!
//! [`RowCursor`] wraps a streaming `rusqlite` result set. Pagination happens
//! as cursor movement ([`RowCursor::seek`] discards rows without mapping
//! them), and aggregate mapping folds the row multiplication caused by
//! one-to-many joins back into one [`Event`] per identifier.

use rusqlite::types::Type;
use rusqlite::{Row, Rows};

use crate::error::{DatabaseResultExt, Result};
use crate::models::event::parse_start_time;
use crate::models::{Event, Rsvp, RsvpStatus};

/// Column order produced by the event hydration query.
///
/// `0..=11` are the root columns (id, name, emoji, description, host,
/// start_time, location, latitude, longitude, is_public, created_at,
/// updated_at), `12` is the joined activity id, and `13..=16` are the joined
/// RSVP columns (rsvp_id, user_id, accepted, comment). Joined columns are
/// nullable because of the LEFT JOINs.
pub(crate) const EVENT_JOIN_COLUMNS: &[&str] = &[
    "events.id",
    "events.name",
    "events.emoji",
    "events.description",
    "events.host",
    "events.start_time",
    "events.location",
    "events.latitude",
    "events.longitude",
    "events.is_public",
    "events.created_at",
    "events.updated_at",
    "event_activities.activity_id",
    "rsvps.rsvp_id",
    "rsvps.user_id",
    "rsvps.accepted",
    "rsvps.comment",
];

const COL_ACTIVITY_ID: usize = 12;
const COL_RSVP_ID: usize = 13;
const COL_RSVP_USER: usize = 14;
const COL_RSVP_ACCEPTED: usize = 15;
const COL_RSVP_COMMENT: usize = 16;

/// Forward-only positioning and entity mapping over a raw result set.
pub struct RowCursor<'stmt> {
    rows: Rows<'stmt>,
}

impl<'stmt> RowCursor<'stmt> {
    /// Wraps a driver-level result set.
    pub fn new(rows: Rows<'stmt>) -> Self {
        Self { rows }
    }

    /// Advances the read position by `offset` rows, discarding them without
    /// mapping. Stops early at the end of the result set.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        for _ in 0..offset {
            let advanced = self
                .rows
                .next()
                .db_context("Failed to advance result cursor")?;
            if advanced.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Reads up to `limit` single-column identifier rows.
    pub fn take_ids(&mut self, limit: usize) -> Result<Vec<i64>> {
        let mut ids = Vec::new();
        while ids.len() < limit {
            let Some(row) = self.rows.next().db_context("Failed to read id row")? else {
                break;
            };
            ids.push(row.get(0).db_context("Failed to map id column")?);
        }
        Ok(ids)
    }

    /// Consumes joined rows and folds them into up to `limit` events.
    ///
    /// Rows must be ordered by event identifier and laid out per
    /// [`EVENT_JOIN_COLUMNS`]. A parent row repeated by its joined children
    /// is merged into a single event accumulating the deduplicated activity
    /// set and RSVP list; `limit` counts distinct events, never raw rows.
    pub fn take_events(&mut self, limit: usize) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = Vec::new();
        if limit == 0 {
            return Ok(events);
        }

        while let Some(row) = self
            .rows
            .next()
            .db_context("Failed to read joined event row")?
        {
            let id: i64 = row.get(0).db_context("Failed to map event id")?;
            let starts_new_event = events.last().map_or(true, |e| e.id != Some(id));

            if starts_new_event {
                if events.len() == limit {
                    break;
                }
                let event = event_from_row(row).db_context("Failed to map event row")?;
                events.push(event);
            }

            let Some(event) = events.last_mut() else {
                continue;
            };

            let activity: Option<i64> = row
                .get(COL_ACTIVITY_ID)
                .db_context("Failed to map activity column")?;
            if let Some(activity) = activity {
                if !event.activities.contains(&activity) {
                    event.activities.push(activity);
                }
            }

            if let Some(rsvp) = rsvp_from_join(row).db_context("Failed to map joined rsvp")? {
                if !event.rsvps.iter().any(|r| r.id == rsvp.id) {
                    event.rsvps.push(rsvp);
                }
            }
        }

        Ok(events)
    }

    /// Reads up to `limit` rows from an RSVP-only query
    /// (`rsvp_id, user_id, event_id, accepted, comment`).
    pub fn take_rsvps(&mut self, limit: usize) -> Result<Vec<Rsvp>> {
        let mut rsvps = Vec::new();
        while rsvps.len() < limit {
            let Some(row) = self.rows.next().db_context("Failed to read rsvp row")? else {
                break;
            };
            rsvps.push(rsvp_from_row(row).db_context("Failed to map rsvp row")?);
        }
        Ok(rsvps)
    }
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    let start_time = match row.get::<_, Option<String>>(5)? {
        Some(s) => Some(parse_start_time(&s).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
        })?),
        None => None,
    };

    Ok(Event {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        emoji: row.get(2)?,
        description: row.get(3)?,
        host: row.get(4)?,
        start_time,
        location: row.get(6)?,
        latitude: row.get(7)?,
        longitude: row.get(8)?,
        is_public: row.get::<_, i64>(9)? != 0,
        activities: Vec::new(),
        rsvps: Vec::new(),
        created_at: timestamp_column(row, 10)?,
        updated_at: timestamp_column(row, 11)?,
    })
}

fn timestamp_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<jiff::Timestamp>> {
    match row.get::<_, Option<String>>(index)? {
        Some(s) => s
            .parse::<jiff::Timestamp>()
            .map(Some)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))),
        None => Ok(None),
    }
}

fn status_from_column(index: usize, value: i64) -> rusqlite::Result<RsvpStatus> {
    RsvpStatus::from_i64(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Integer,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid rsvp acceptance state: {value}"),
            )),
        )
    })
}

/// Maps the RSVP half of a joined row; `None` when the LEFT JOIN produced no
/// RSVP for this row.
fn rsvp_from_join(row: &Row<'_>) -> rusqlite::Result<Option<Rsvp>> {
    let Some(rsvp_id) = row.get::<_, Option<i64>>(COL_RSVP_ID)? else {
        return Ok(None);
    };

    let accepted: i64 = row.get(COL_RSVP_ACCEPTED)?;
    Ok(Some(Rsvp {
        id: Some(rsvp_id),
        event_id: Some(row.get(0)?),
        user_id: row.get(COL_RSVP_USER)?,
        status: status_from_column(COL_RSVP_ACCEPTED, accepted)?,
        comment: row.get(COL_RSVP_COMMENT)?,
    }))
}

fn rsvp_from_row(row: &Row<'_>) -> rusqlite::Result<Rsvp> {
    let accepted: i64 = row.get(3)?;
    Ok(Rsvp {
        id: Some(row.get(0)?),
        event_id: Some(row.get(2)?),
        user_id: row.get(1)?,
        status: status_from_column(3, accepted)?,
        comment: row.get(4)?,
    })
}
