//! Event aggregate root definition.

use jiff::civil::DateTime;
use jiff::Timestamp;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use super::Rsvp;
use crate::error::{Result, StoreError};

/// Column format for event start times.
pub(crate) const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An event together with its activity tags and RSVPs.
///
/// The identifier and the two bookkeeping timestamps are assigned by the
/// store; they are `None` on an aggregate that has not been persisted yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Store-assigned identifier, absent before creation
    pub id: Option<i64>,

    /// Display name of the event
    pub name: String,

    /// Emoji shown next to the name
    pub emoji: String,

    /// Free-text description
    pub description: String,

    /// Identifier of the hosting user
    pub host: i64,

    /// Scheduled start, wall-clock time without a zone
    pub start_time: Option<DateTime>,

    /// Human-readable location label
    pub location: String,

    /// Latitude of the venue in degrees
    pub latitude: f64,

    /// Longitude of the venue in degrees
    pub longitude: f64,

    /// Whether the event is publicly visible
    pub is_public: bool,

    /// Associated activity tag identifiers (set semantics, unordered)
    #[serde(default)]
    pub activities: Vec<i64>,

    /// RSVP records for this event
    #[serde(default)]
    pub rsvps: Vec<Rsvp>,

    /// Timestamp when the event was created (store-assigned, read-only)
    pub created_at: Option<Timestamp>,

    /// Timestamp when the event was last modified (store-assigned, read-only)
    pub updated_at: Option<Timestamp>,
}

impl Event {
    /// Root-table column/value pairs for insert and update statements.
    ///
    /// Identifier and bookkeeping timestamps are excluded; the store assigns
    /// those itself.
    pub(crate) fn to_row(&self) -> Vec<(&'static str, Value)> {
        let start_time = match self.start_time {
            Some(dt) => Value::from(format_start_time(&dt)),
            None => Value::Null,
        };

        vec![
            ("name", Value::from(self.name.clone())),
            ("emoji", Value::from(self.emoji.clone())),
            ("description", Value::from(self.description.clone())),
            ("host", Value::from(self.host)),
            ("start_time", start_time),
            ("location", Value::from(self.location.clone())),
            ("latitude", Value::from(self.latitude)),
            ("longitude", Value::from(self.longitude)),
            ("is_public", Value::from(i64::from(self.is_public))),
        ]
    }

    /// Returns the identifier, or an input error for aggregates that have
    /// never been persisted.
    pub(crate) fn require_id(&self) -> Result<i64> {
        self.id.ok_or_else(|| {
            StoreError::invalid_input("id", "event must carry a store-assigned identifier")
        })
    }
}

/// Formats a start time for storage in the `start_time` column.
pub(crate) fn format_start_time(dt: &DateTime) -> String {
    dt.strftime(START_TIME_FORMAT).to_string()
}

/// Parses a `start_time` column value.
pub(crate) fn parse_start_time(s: &str) -> std::result::Result<DateTime, jiff::Error> {
    DateTime::strptime(START_TIME_FORMAT, s)
}
