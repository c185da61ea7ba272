//! Tabular store access.
//!
//! The roster and identity tables live in a Google spreadsheet. Everything
//! above this module talks to the `TableStore` trait, which only knows about
//! A1 ranges and rows of strings.

pub mod auth;
pub mod client;
pub mod range;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::common::error::StoreResult;

pub use client::SheetsClient;
pub use range::SheetRange;

/// Row-oriented access to a remote table.
///
/// Implementations never cache and never retry: every call goes to the
/// store and any failure is returned as-is.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Read a range as rows of cells. Trailing empty cells may be omitted.
    async fn read_range(&self, range: &str) -> StoreResult<Vec<Vec<String>>>;

    /// Overwrite cells starting at the top-left of `range` with one row.
    async fn write_row(&self, range: &str, values: Vec<String>) -> StoreResult<()>;

    /// Append one row after the last row holding data in `range`.
    async fn append_row(&self, range: &str, values: Vec<String>) -> StoreResult<()>;

    /// Overwrite a single cell.
    async fn write_cell(&self, range: &str, value: &str) -> StoreResult<()> {
        self.write_row(range, vec![value.to_string()]).await
    }
}

/// Cell at `index` of a row, empty when the row is short.
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}
