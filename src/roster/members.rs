//! Typed access to the character roster sheet.

use std::sync::Arc;

use tracing::debug;

use crate::common::error::StoreResult;
use crate::common::types::{CharacterRecord, Presence, RowPosition};
use crate::sheets::{cell, SheetRange, TableStore};

/// Roster columns (A-L). K is unused.
pub mod columns {
    pub const FIRST: &str = "A";
    pub const LAST: &str = "L";
    pub const NICKNAME: &str = "B";
    pub const PRESENCE: &str = "E";
    pub const OWNER_MAIN: &str = "J";
    pub const AUTH_STATUS: &str = "L";
}

const RANK: usize = 0;
const NICKNAME: usize = 1;
const CLASS: usize = 2;
const AGE: usize = 3;
const PRESENCE: usize = 4;
const KAKAO: usize = 5;
const MAX_COMBAT_SCORE: usize = 6;
const COMBAT_SCORE: usize = 7;
const COMBAT_POWER: usize = 8;
const OWNER_MAIN: usize = 9;
const AUTH_STATUS: usize = 11;

/// Header row plus 1-based numbering: physical index 0 is sheet row 2.
const FIRST_DATA_ROW: RowPosition = 2;

/// Roster rows keyed by nickname.
#[derive(Clone)]
pub struct RosterRepository {
    store: Arc<dyn TableStore>,
    range: SheetRange,
}

impl RosterRepository {
    pub fn new(store: Arc<dyn TableStore>, range: SheetRange) -> Self {
        Self { store, range }
    }

    /// All roster records, header skipped, rows without a nickname dropped.
    pub async fn list_members(&self) -> StoreResult<Vec<CharacterRecord>> {
        let rows = self
            .store
            .read_range(&self.range.columns(columns::FIRST, columns::LAST))
            .await?;

        let members: Vec<CharacterRecord> = rows
            .iter()
            .skip(1)
            .enumerate()
            .map(|(index, row)| parse_row(index as RowPosition + FIRST_DATA_ROW, row))
            .filter(|record| !record.nickname.is_empty())
            .collect();

        debug!("Loaded {} roster records", members.len());
        Ok(members)
    }

    /// First record with this nickname.
    pub async fn find_by_nickname(&self, nickname: &str) -> StoreResult<Option<CharacterRecord>> {
        Ok(find_by_nickname(&self.list_members().await?, nickname).cloned())
    }

    pub async fn set_presence(&self, row: RowPosition, presence: Presence) -> StoreResult<()> {
        self.store
            .write_cell(&self.range.cell(columns::PRESENCE, row), presence.as_cell())
            .await
    }

    pub async fn set_nickname(&self, row: RowPosition, nickname: &str) -> StoreResult<()> {
        self.store
            .write_cell(&self.range.cell(columns::NICKNAME, row), nickname)
            .await
    }

    pub async fn set_owner_main(&self, row: RowPosition, main: &str) -> StoreResult<()> {
        self.store
            .write_cell(&self.range.cell(columns::OWNER_MAIN, row), main)
            .await
    }

    /// Writes `O` when verified, blank otherwise.
    pub async fn set_auth_status(&self, row: RowPosition, verified: bool) -> StoreResult<()> {
        let value = if verified { "O" } else { "" };
        self.store
            .write_cell(&self.range.cell(columns::AUTH_STATUS, row), value)
            .await
    }
}

/// First match in scan order; later duplicates are shadowed.
pub fn find_by_nickname<'a>(
    members: &'a [CharacterRecord],
    nickname: &str,
) -> Option<&'a CharacterRecord> {
    members.iter().find(|m| m.nickname == nickname)
}

fn parse_row(row: RowPosition, cells: &[String]) -> CharacterRecord {
    CharacterRecord {
        row,
        rank: cell(cells, RANK).to_string(),
        nickname: cell(cells, NICKNAME).to_string(),
        class_name: cell(cells, CLASS).to_string(),
        age: cell(cells, AGE).to_string(),
        presence: Presence::from_cell(cell(cells, PRESENCE)),
        kakao_contact: cell(cells, KAKAO).to_string(),
        max_combat_score: cell(cells, MAX_COMBAT_SCORE).to_string(),
        combat_score: cell(cells, COMBAT_SCORE).to_string(),
        combat_power: cell(cells, COMBAT_POWER).to_string(),
        owner_main: cell(cells, OWNER_MAIN).to_string(),
        verified: cell(cells, AUTH_STATUS) == "O",
    }
}
