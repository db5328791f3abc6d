//! Validated pagination parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A page request: how many events (or RSVPs) per page, and which page.
///
/// Page numbers are 1-indexed. Zero sizes and zero page numbers are rejected
/// at construction rather than silently reinterpreted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    size: u32,
    number: u32,
}

impl Page {
    /// Creates a page request, rejecting `size == 0` and `number == 0`.
    pub fn new(size: u32, number: u32) -> Result<Self> {
        if size == 0 {
            return Err(StoreError::invalid_input(
                "page_size",
                "page size must be at least 1",
            ));
        }
        if number == 0 {
            return Err(StoreError::invalid_input(
                "page_number",
                "page numbers are 1-indexed",
            ));
        }
        Ok(Self { size, number })
    }

    /// Number of items on a full page.
    pub fn size(self) -> u32 {
        self.size
    }

    /// 1-indexed page number.
    pub fn number(self) -> u32 {
        self.number
    }

    /// Rows to skip before the page begins: `size × (number − 1)` past the
    /// first page, zero on it.
    pub fn offset(self) -> u64 {
        if self.number > 1 {
            u64::from(self.size) * u64::from(self.number - 1)
        } else {
            0
        }
    }
}

impl Default for Page {
    /// Ten items, first page.
    fn default() -> Self {
        Self {
            size: 10,
            number: 1,
        }
    }
}
