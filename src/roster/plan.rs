//! Ordered write plans.
//!
//! Multi-row operations are computed up front as a list of single writes and
//! then applied one by one. There is no rollback: if a write fails, the ones
//! before it stay applied and the error is returned.

use tracing::debug;

use crate::common::error::StoreResult;
use crate::common::types::{Presence, RowPosition};
use crate::roster::identities::IdentityRepository;
use crate::roster::members::RosterRepository;

/// One write against the roster or identity sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetWrite {
    Presence { row: RowPosition, presence: Presence },
    Nickname { row: RowPosition, nickname: String },
    OwnerMain { row: RowPosition, main: String },
    AuthStatus { row: RowPosition, verified: bool },
    CreateIdentity { account_id: String, main: String },
    IdentityMain { row: RowPosition, main: String },
    IdentityAlts { row: RowPosition, alts: Vec<String> },
    ClearIdentity { row: RowPosition },
}

/// Applies write plans through the repositories.
#[derive(Clone)]
pub struct WriteApplier {
    roster: RosterRepository,
    identities: IdentityRepository,
}

impl WriteApplier {
    pub fn new(roster: RosterRepository, identities: IdentityRepository) -> Self {
        Self { roster, identities }
    }

    /// Apply writes in order, stopping at the first failure.
    pub async fn apply(&self, writes: &[SheetWrite]) -> StoreResult<()> {
        for write in writes {
            debug!("Applying {:?}", write);
            self.apply_one(write).await?;
        }
        Ok(())
    }

    async fn apply_one(&self, write: &SheetWrite) -> StoreResult<()> {
        match write {
            SheetWrite::Presence { row, presence } => self.roster.set_presence(*row, *presence).await,
            SheetWrite::Nickname { row, nickname } => self.roster.set_nickname(*row, nickname).await,
            SheetWrite::OwnerMain { row, main } => self.roster.set_owner_main(*row, main).await,
            SheetWrite::AuthStatus { row, verified } => {
                self.roster.set_auth_status(*row, *verified).await
            }
            SheetWrite::CreateIdentity { account_id, main } => {
                self.identities.create(account_id, main).await
            }
            SheetWrite::IdentityMain { row, main } => self.identities.set_main(*row, main).await,
            SheetWrite::IdentityAlts { row, alts } => self.identities.set_alts(*row, alts).await,
            SheetWrite::ClearIdentity { row } => self.identities.clear(*row).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::sheets::memory::MemoryStore;
    use crate::sheets::{SheetRange, TableStore};

    fn applier(store: Arc<MemoryStore>) -> WriteApplier {
        let store: Arc<dyn TableStore> = store;
        WriteApplier::new(
            RosterRepository::new(store.clone(), SheetRange::first_sheet()),
            IdentityRepository::new(store, SheetRange::named("Auth")),
        )
    }

    #[tokio::test]
    async fn test_apply_in_order() {
        let store = Arc::new(MemoryStore::new());
        let applier = applier(store.clone());

        applier
            .apply(&[
                SheetWrite::CreateIdentity {
                    account_id: "u1".to_string(),
                    main: "Aria".to_string(),
                },
                SheetWrite::Presence {
                    row: 2,
                    presence: Presence::Present,
                },
                SheetWrite::AuthStatus {
                    row: 2,
                    verified: true,
                },
                SheetWrite::IdentityAlts {
                    row: 1,
                    alts: vec!["Beta".to_string()],
                },
            ])
            .await
            .unwrap();

        let ranges: Vec<String> = store.writes().into_iter().map(|(range, _)| range).collect();
        assert_eq!(ranges, vec!["Auth!A:C", "E2", "L2", "Auth!C1"]);
    }

    #[tokio::test]
    async fn test_apply_stops_at_first_failure() {
        let store = Arc::new(MemoryStore::new());
        store.fail_writes();
        let applier = applier(store.clone());

        let result = applier
            .apply(&[
                SheetWrite::Presence {
                    row: 2,
                    presence: Presence::Absent,
                },
                SheetWrite::ClearIdentity { row: 2 },
            ])
            .await;

        assert!(result.is_err());
        assert!(store.writes().is_empty());
    }
}
