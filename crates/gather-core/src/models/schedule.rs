//! Schedule-based event filtering.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Classifies events relative to the current date.
///
/// Applied only to the identifier-resolution phase of a paginated read; the
/// hydration phase is identical for every variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleFilter {
    /// No schedule restriction
    #[default]
    All,

    /// Events starting today or later
    Upcoming,

    /// Events that started before today
    Past,
}

impl ScheduleFilter {
    /// SQL predicate over the `start_time` column, if the variant restricts
    /// anything.
    pub(crate) fn predicate(self) -> Option<&'static str> {
        match self {
            ScheduleFilter::All => None,
            ScheduleFilter::Upcoming => Some("start_time >= DATE('now')"),
            ScheduleFilter::Past => Some("start_time < DATE('now')"),
        }
    }
}

impl FromStr for ScheduleFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ScheduleFilter::All),
            "upcoming" => Ok(ScheduleFilter::Upcoming),
            "past" => Ok(ScheduleFilter::Past),
            _ => Err(format!("Invalid schedule filter: {s}")),
        }
    }
}
