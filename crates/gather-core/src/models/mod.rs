//! Data models for events and RSVPs.
//!
//! The [`Event`] aggregate root owns its activity tag set and its RSVP list;
//! both are read and written together with the root row by
//! [`crate::store::EventStore`]. Pagination of every read operation is
//! described by [`Page`], and schedule-based filtering by [`ScheduleFilter`].

pub mod event;
pub mod page;
pub mod rsvp;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use event::Event;
pub use page::Page;
pub use rsvp::{Rsvp, RsvpStatus};
pub use schedule::ScheduleFilter;
