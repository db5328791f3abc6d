//! Unit tests for the data models.

use jiff::civil;

use super::event::{format_start_time, parse_start_time};
use super::{Page, Rsvp, RsvpStatus, ScheduleFilter};
use crate::error::StoreError;

#[test]
fn test_page_offset_first_page_is_zero() {
    let page = Page::new(10, 1).unwrap();
    assert_eq!(page.offset(), 0);
}

#[test]
fn test_page_offset_scales_with_page_number() {
    assert_eq!(Page::new(10, 2).unwrap().offset(), 10);
    assert_eq!(Page::new(5, 3).unwrap().offset(), 10);
    assert_eq!(Page::new(25, 4).unwrap().offset(), 75);
}

#[test]
fn test_page_rejects_zero_size() {
    let err = Page::new(0, 1).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput { ref field, .. } if field == "page_size"));
}

#[test]
fn test_page_rejects_zero_number() {
    let err = Page::new(10, 0).unwrap_err();
    assert!(matches!(err, StoreError::InvalidInput { ref field, .. } if field == "page_number"));
}

#[test]
fn test_page_default() {
    let page = Page::default();
    assert_eq!(page.size(), 10);
    assert_eq!(page.number(), 1);
    assert_eq!(page.offset(), 0);
}

#[test]
fn test_rsvp_status_integer_round_trip() {
    for status in [RsvpStatus::Pending, RsvpStatus::Declined, RsvpStatus::Accepted] {
        assert_eq!(RsvpStatus::from_i64(status.as_i64()), Some(status));
    }
    assert_eq!(RsvpStatus::from_i64(7), None);
}

#[test]
fn test_rsvp_status_default_is_pending() {
    assert_eq!(RsvpStatus::default(), RsvpStatus::Pending);
    let rsvp = Rsvp::pending("u1");
    assert_eq!(rsvp.status, RsvpStatus::Pending);
    assert!(rsvp.comment.is_empty());
    assert!(rsvp.id.is_none());
}

#[test]
fn test_schedule_filter_parsing() {
    assert_eq!("all".parse::<ScheduleFilter>().unwrap(), ScheduleFilter::All);
    assert_eq!(
        "Upcoming".parse::<ScheduleFilter>().unwrap(),
        ScheduleFilter::Upcoming
    );
    assert_eq!(
        "past".parse::<ScheduleFilter>().unwrap(),
        ScheduleFilter::Past
    );
    assert!("tomorrow".parse::<ScheduleFilter>().is_err());
}

#[test]
fn test_start_time_column_round_trip() {
    let dt = civil::date(2024, 6, 1).at(12, 0, 0, 0);
    let formatted = format_start_time(&dt);
    assert_eq!(formatted, "2024-06-01 12:00:00");
    assert_eq!(parse_start_time(&formatted).unwrap(), dt);
}
