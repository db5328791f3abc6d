//! Geo-proximity search delegate.
//!
//! The distance computation lives database-side as the SQL scalar function
//! `haversine_miles`, registered on every pooled connection. The accessor
//! treats it as opaque: it asks for identifier rows ordered by distance and
//! applies the standard cursor pagination on top.

use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection};

use crate::cursor::RowCursor;
use crate::error::{DatabaseResultExt, Result};
use crate::models::Page;

use super::EventStore;

const NEAR_LOCATION_SQL: &str = "\
    SELECT id FROM events \
    WHERE haversine_miles(latitude, longitude, ?1, ?2) <= ?3 \
    ORDER BY haversine_miles(latitude, longitude, ?1, ?2), id";

impl EventStore {
    /// Retrieves one page of event identifiers within `miles` of a point,
    /// closest first.
    ///
    /// Deliberately returns identifiers only: proximity ranking and
    /// full-record hydration are separate calls, so callers can cache or
    /// re-filter the identifier set before hydrating with
    /// [`EventStore::get_events_with_ids`].
    pub fn get_event_ids_near_location(
        &self,
        latitude: f64,
        longitude: f64,
        miles: f64,
        page: Page,
    ) -> Result<Option<Vec<i64>>> {
        let conn = self.acquire()?;

        let mut stmt = conn
            .prepare(NEAR_LOCATION_SQL)
            .db_context("Failed to prepare proximity query")?;
        let rows = stmt
            .query(params![latitude, longitude, miles])
            .db_context("Failed to run proximity query")?;

        let mut cursor = RowCursor::new(rows);
        cursor.seek(page.offset())?;
        let ids = cursor.take_ids(page.size() as usize)?;

        Ok((!ids.is_empty()).then_some(ids))
    }
}

/// Registers the store-side SQL functions on a fresh connection.
pub(super) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "haversine_miles",
        4,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let lat1 = ctx.get::<f64>(0)?;
            let lon1 = ctx.get::<f64>(1)?;
            let lat2 = ctx.get::<f64>(2)?;
            let lon2 = ctx.get::<f64>(3)?;
            Ok(haversine_miles(lat1, lon1, lat2, lon2))
        },
    )
}

/// Great-circle distance between two coordinates, in miles.
fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_MILES: f64 = 3958.8;

    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

#[cfg(test)]
mod tests {
    use super::haversine_miles;

    #[test]
    fn test_zero_distance_at_same_point() {
        assert!(haversine_miles(40.0, -75.0, 40.0, -75.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance_new_york_to_philadelphia() {
        // Midtown Manhattan to Center City Philadelphia, roughly 80 miles.
        let miles = haversine_miles(40.7549, -73.9840, 39.9526, -75.1652);
        assert!((75.0..=90.0).contains(&miles), "got {miles}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let there = haversine_miles(40.0, -75.0, 41.0, -74.0);
        let back = haversine_miles(41.0, -74.0, 40.0, -75.0);
        assert!((there - back).abs() < 1e-9);
    }
}
