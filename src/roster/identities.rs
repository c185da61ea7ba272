//! Typed access to the identity sheet (Discord account -> main + alts).

use std::sync::Arc;

use tracing::debug;

use crate::common::error::StoreResult;
use crate::common::types::{IdentityRecord, RowPosition};
use crate::sheets::{cell, SheetRange, TableStore};

mod columns {
    pub const ACCOUNT: &str = "A";
    pub const MAIN: &str = "B";
    pub const ALTS: &str = "C";
}

const FIRST_DATA_ROW: RowPosition = 2;

/// Identity rows keyed by Discord account id.
///
/// Rows are never removed: `clear` blanks them, and blank rows are skipped
/// on read, so row positions stay stable.
#[derive(Clone)]
pub struct IdentityRepository {
    store: Arc<dyn TableStore>,
    range: SheetRange,
}

impl IdentityRepository {
    pub fn new(store: Arc<dyn TableStore>, range: SheetRange) -> Self {
        Self { store, range }
    }

    pub async fn list_identities(&self) -> StoreResult<Vec<IdentityRecord>> {
        let rows = self
            .store
            .read_range(&self.range.columns(columns::ACCOUNT, columns::ALTS))
            .await?;

        let identities: Vec<IdentityRecord> = rows
            .iter()
            .skip(1)
            .enumerate()
            .map(|(index, row)| IdentityRecord {
                row: index as RowPosition + FIRST_DATA_ROW,
                account_id: cell(row, 0).to_string(),
                main: cell(row, 1).to_string(),
                alts: parse_alts(cell(row, 2)),
            })
            .filter(|identity| !identity.account_id.is_empty())
            .collect();

        debug!("Loaded {} identity records", identities.len());
        Ok(identities)
    }

    /// First identity for this account.
    pub async fn find_by_account(&self, account_id: &str) -> StoreResult<Option<IdentityRecord>> {
        Ok(self
            .list_identities()
            .await?
            .into_iter()
            .find(|identity| identity.account_id == account_id))
    }

    /// Append a new identity with no alts.
    pub async fn create(&self, account_id: &str, main: &str) -> StoreResult<()> {
        self.store
            .append_row(
                &self.range.columns(columns::ACCOUNT, columns::ALTS),
                vec![account_id.to_string(), main.to_string(), String::new()],
            )
            .await
    }

    pub async fn set_main(&self, row: RowPosition, main: &str) -> StoreResult<()> {
        self.store
            .write_cell(&self.range.cell(columns::MAIN, row), main)
            .await
    }

    pub async fn set_alts(&self, row: RowPosition, alts: &[String]) -> StoreResult<()> {
        self.store
            .write_cell(&self.range.cell(columns::ALTS, row), &join_alts(alts))
            .await
    }

    /// Soft delete: blank the account, main and alts cells.
    pub async fn clear(&self, row: RowPosition) -> StoreResult<()> {
        self.store
            .write_row(
                &self.range.row_span(columns::ACCOUNT, columns::ALTS, row),
                vec![String::new(); 3],
            )
            .await
    }
}

/// Split a comma-joined alt list, trimming entries and dropping empty ones.
pub fn parse_alts(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|alt| !alt.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_alts(alts: &[String]) -> String {
    alts.join(",")
}
