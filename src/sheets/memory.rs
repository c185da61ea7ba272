//! In-memory `TableStore` for tests.
//!
//! Keeps one grid per sheet and follows the Sheets API closely enough for the
//! repositories: reads trim trailing empty cells and rows, appends land after
//! the last row with data, and every write is logged.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::common::error::{StoreError, StoreResult};
use crate::sheets::TableStore;

/// A parsed A1 range: sheet, column span and optional row span.
#[derive(Debug, Clone, PartialEq, Eq)]
struct A1 {
    sheet: String,
    first_col: usize,
    last_col: usize,
    first_row: Option<usize>,
    last_row: Option<usize>,
}

fn column_index(letters: &str) -> usize {
    letters
        .bytes()
        .fold(0, |acc, b| acc * 26 + (b.to_ascii_uppercase() - b'A' + 1) as usize)
        - 1
}

fn parse_ref(part: &str) -> Option<(usize, Option<usize>)> {
    let split = part.find(|c: char| c.is_ascii_digit()).unwrap_or(part.len());
    let (letters, digits) = part.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let row = if digits.is_empty() {
        None
    } else {
        Some(digits.parse::<usize>().ok()?)
    };
    Some((column_index(letters), row))
}

fn parse_a1(range: &str) -> Option<A1> {
    let (sheet, cells) = match range.rfind('!') {
        Some(pos) => {
            let name = &range[..pos];
            let name = name
                .strip_prefix('\'')
                .and_then(|n| n.strip_suffix('\''))
                .map(|n| n.replace("''", "'"))
                .unwrap_or_else(|| name.to_string());
            (name, &range[pos + 1..])
        }
        None => (String::new(), range),
    };

    let (start, end) = match cells.split_once(':') {
        Some((start, end)) => (parse_ref(start)?, parse_ref(end)?),
        None => {
            let single = parse_ref(cells)?;
            (single, single)
        }
    };

    Some(A1 {
        sheet,
        first_col: start.0,
        last_col: end.0,
        first_row: start.1,
        last_row: end.1,
    })
}

/// A store holding sheets as grids of strings.
#[derive(Default)]
pub struct MemoryStore {
    sheets: Mutex<HashMap<String, Vec<Vec<String>>>>,
    writes: Mutex<Vec<(String, Vec<String>)>>,
    fail_writes: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a whole sheet. `""` is the first (unnamed) sheet.
    pub fn with_sheet(self, sheet: &str, rows: Vec<Vec<&str>>) -> Self {
        let grid = rows
            .into_iter()
            .map(|row| row.into_iter().map(str::to_string).collect())
            .collect();
        self.sheets
            .lock()
            .unwrap()
            .insert(sheet.to_string(), grid);
        self
    }

    /// Every `write_row` and `append_row` call so far, in order.
    pub fn writes(&self) -> Vec<(String, Vec<String>)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.lock().unwrap().clear();
    }

    /// Make every subsequent write fail with an API error.
    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    /// Cell value by sheet, column letters and 1-based row.
    pub fn cell(&self, sheet: &str, column: &str, row: usize) -> String {
        let sheets = self.sheets.lock().unwrap();
        sheets
            .get(sheet)
            .and_then(|grid| grid.get(row - 1))
            .and_then(|r| r.get(column_index(column)))
            .cloned()
            .unwrap_or_default()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StoreError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn put(&self, a1: &A1, row: usize, values: &[String]) {
        let mut sheets = self.sheets.lock().unwrap();
        let grid = sheets.entry(a1.sheet.clone()).or_default();
        while grid.len() <= row {
            grid.push(Vec::new());
        }
        let target = &mut grid[row];
        for (offset, value) in values.iter().enumerate() {
            let col = a1.first_col + offset;
            while target.len() <= col {
                target.push(String::new());
            }
            target[col] = value.clone();
        }
    }
}

fn invalid(range: &str) -> StoreError {
    StoreError::Api {
        status: 400,
        message: format!("Unable to parse range: {}", range),
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read_range(&self, range: &str) -> StoreResult<Vec<Vec<String>>> {
        let a1 = parse_a1(range).ok_or_else(|| invalid(range))?;
        let sheets = self.sheets.lock().unwrap();
        let Some(grid) = sheets.get(&a1.sheet) else {
            return Ok(Vec::new());
        };

        let first_row = a1.first_row.map(|r| r - 1).unwrap_or(0);
        let last_row = a1.last_row.map(|r| r - 1).unwrap_or(usize::MAX);

        let mut rows: Vec<Vec<String>> = grid
            .iter()
            .enumerate()
            .filter(|(i, _)| *i >= first_row && *i <= last_row)
            .map(|(_, row)| {
                let mut cells: Vec<String> = (a1.first_col..=a1.last_col)
                    .map(|c| row.get(c).cloned().unwrap_or_default())
                    .collect();
                while cells.last().is_some_and(|c| c.is_empty()) {
                    cells.pop();
                }
                cells
            })
            .collect();

        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Ok(rows)
    }

    async fn write_row(&self, range: &str, values: Vec<String>) -> StoreResult<()> {
        self.check_writable()?;
        let a1 = parse_a1(range).ok_or_else(|| invalid(range))?;
        let row = a1.first_row.ok_or_else(|| invalid(range))? - 1;
        self.put(&a1, row, &values);
        self.writes.lock().unwrap().push((range.to_string(), values));
        Ok(())
    }

    async fn append_row(&self, range: &str, values: Vec<String>) -> StoreResult<()> {
        self.check_writable()?;
        let a1 = parse_a1(range).ok_or_else(|| invalid(range))?;
        let next_row = {
            let sheets = self.sheets.lock().unwrap();
            sheets
                .get(&a1.sheet)
                .map(|grid| {
                    grid.iter()
                        .rposition(|row| {
                            (a1.first_col..=a1.last_col)
                                .any(|c| row.get(c).is_some_and(|v| !v.is_empty()))
                        })
                        .map(|i| i + 1)
                        .unwrap_or(0)
                })
                .unwrap_or(0)
        };
        self.put(&a1, next_row, &values);
        self.writes.lock().unwrap().push((range.to_string(), values));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_a1() {
        let a1 = parse_a1("'My Sheet'!B3:D7").unwrap();
        assert_eq!(a1.sheet, "My Sheet");
        assert_eq!((a1.first_col, a1.last_col), (1, 3));
        assert_eq!((a1.first_row, a1.last_row), (Some(3), Some(7)));

        let a1 = parse_a1("A:L").unwrap();
        assert_eq!(a1.sheet, "");
        assert_eq!((a1.first_col, a1.last_col), (0, 11));
        assert_eq!(a1.first_row, None);

        assert!(parse_a1("Auth!").is_none());
        assert_eq!(column_index("AA"), 26);
    }

    #[tokio::test]
    async fn test_read_trims_trailing_cells_and_rows() {
        let store = MemoryStore::new().with_sheet(
            "",
            vec![vec!["a", "b", ""], vec!["c", "", ""], vec!["", ""]],
        );

        let rows = store.read_range("A:C").await.unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c"]]);
    }

    #[tokio::test]
    async fn test_append_after_last_data_row() {
        let store = MemoryStore::new().with_sheet(
            "Auth",
            vec![vec!["id", "main", "alts"], vec!["", "", ""], vec!["u1", "Aria"]],
        );

        store
            .append_row("Auth!A:C", vec!["u2".into(), "Beta".into(), "".into()])
            .await
            .unwrap();

        assert_eq!(store.cell("Auth", "A", 4), "u2");
        assert_eq!(store.cell("Auth", "B", 4), "Beta");
    }

    #[tokio::test]
    async fn test_failing_writes() {
        let store = MemoryStore::new();
        store.fail_writes();
        assert!(store.write_cell("E2", "O").await.is_err());
        assert!(store.writes().is_empty());
    }
}
