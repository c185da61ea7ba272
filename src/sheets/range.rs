//! A1 notation helpers.

use crate::common::types::RowPosition;

/// Builds A1 ranges for one sheet of the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    /// Sheet name, or `None` for the first sheet.
    sheet: Option<String>,
}

impl SheetRange {
    /// Ranges on the named sheet.
    pub fn named(sheet: impl Into<String>) -> Self {
        Self {
            sheet: Some(sheet.into()),
        }
    }

    /// Ranges on the first sheet (no prefix).
    pub fn first_sheet() -> Self {
        Self { sheet: None }
    }

    pub fn from_option(sheet: Option<&str>) -> Self {
        match sheet {
            Some(name) => Self::named(name),
            None => Self::first_sheet(),
        }
    }

    /// Whole-column span, e.g. `Auth!A:C`.
    pub fn columns(&self, first: &str, last: &str) -> String {
        format!("{}{}:{}", self.prefix(), first, last)
    }

    /// A single cell, e.g. `E12`.
    pub fn cell(&self, column: &str, row: RowPosition) -> String {
        format!("{}{}{}", self.prefix(), column, row)
    }

    /// Part of one row, e.g. `Auth!A5:C5`.
    pub fn row_span(&self, first: &str, last: &str, row: RowPosition) -> String {
        format!("{}{}{}:{}{}", self.prefix(), first, row, last, row)
    }

    fn prefix(&self) -> String {
        match &self.sheet {
            None => String::new(),
            Some(name) if is_plain_name(name) => format!("{}!", name),
            Some(name) => format!("'{}'!", name.replace('\'', "''")),
        }
    }
}

/// Names made only of ASCII letters, digits and underscores need no quoting.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}
