//! RSVP child entity and its acceptance state.

use serde::{Deserialize, Serialize};

/// A single user's RSVP for an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rsvp {
    /// Store-assigned identifier, absent before creation
    pub id: Option<i64>,

    /// Identifier of the owning event
    pub event_id: Option<i64>,

    /// Identifier of the responding user
    pub user_id: String,

    /// Acceptance state
    #[serde(default)]
    pub status: RsvpStatus,

    /// Free-text comment attached to the response
    #[serde(default)]
    pub comment: String,
}

impl Rsvp {
    /// A fresh pending RSVP for a user, not yet persisted.
    pub fn pending(user_id: impl Into<String>) -> Self {
        Self {
            id: None,
            event_id: None,
            user_id: user_id.into(),
            status: RsvpStatus::Pending,
            comment: String::new(),
        }
    }
}

/// Tri-state acceptance of an RSVP.
///
/// Stored as an integer column: `-1` pending, `0` declined, `1` accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    /// The invitee has not responded yet (the state every new RSVP starts in)
    #[default]
    Pending,

    /// The invitee declined
    Declined,

    /// The invitee accepted
    Accepted,
}

impl RsvpStatus {
    /// Database integer representation.
    pub fn as_i64(self) -> i64 {
        match self {
            RsvpStatus::Pending => -1,
            RsvpStatus::Declined => 0,
            RsvpStatus::Accepted => 1,
        }
    }

    /// Parses the database integer representation.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            -1 => Some(RsvpStatus::Pending),
            0 => Some(RsvpStatus::Declined),
            1 => Some(RsvpStatus::Accepted),
            _ => None,
        }
    }
}
