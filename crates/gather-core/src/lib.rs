//! Core storage library for the Gather events service.
//!
//! This crate persists and retrieves the Event aggregate — an event plus its
//! activity tags and RSVP records — against a pooled SQLite database. The
//! HTTP handler layer above it deals in the models re-exported here and in
//! the operations on [`EventStore`].
//!
//! # Design
//!
//! - **Two-phase pagination**: every paginated read first resolves a stable
//!   page of root identifiers, then joins child tables for exactly those
//!   identifiers. One-to-many joins therefore never skew page boundaries.
//! - **Aggregate transactions**: multi-statement writes run on one pooled
//!   connection inside one transaction and either commit everything or roll
//!   everything back. Referential integrity between an event and its
//!   children is enforced here, not by database constraints.
//! - **Tagged write outcomes**: writes report [`store::WriteOutcome`] instead
//!   of a bare boolean, distinguishing "target row missing" from statement
//!   and pool failures.
//!
//! # Quick Start
//!
//! ```no_run
//! use gather_core::{EventStore, Page, ScheduleFilter};
//!
//! fn main() -> gather_core::Result<()> {
//!     let store = EventStore::open("events.db", 4)?;
//!
//!     let page = Page::new(10, 1)?;
//!     if let Some(events) = store.get_events(page, ScheduleFilter::Upcoming)? {
//!         for event in events {
//!             println!("{} {} ({} rsvps)", event.emoji, event.name, event.rsvps.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod cursor;
pub mod error;
pub mod models;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use cursor::RowCursor;
pub use error::{Result, StoreError};
pub use models::{Event, Page, Rsvp, RsvpStatus, ScheduleFilter};
pub use query::{JoinKind, Query, QueryBuilder, SortOrder};
pub use store::{EventStore, WriteOutcome};
