//! Roster service: the operations the Discord front-end calls.
//!
//! Every operation re-reads the sheets it needs, plans its writes, and
//! applies them in order. Nothing is cached between calls and nothing is
//! locked, so concurrent handlers can interleave (last writer wins).

use std::sync::Arc;

use tracing::{debug, info};

use crate::common::error::{RosterError, RosterResult};
use crate::common::types::{CharacterRecord, GuildMember, IdentityRecord};
use crate::roster::identities::IdentityRepository;
use crate::roster::members::{find_by_nickname, RosterRepository};
use crate::roster::ops::{self, LinkOutcome};
use crate::roster::plan::{SheetWrite, WriteApplier};
use crate::roster::reconcile::{plan_guild_sync, plan_member_sync, SyncSummary};
use crate::roster::resolver::IdentityResolver;
use crate::sheets::{SheetRange, TableStore};

/// A roster row owned by an account, tagged main or alt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedCharacter {
    pub record: CharacterRecord,
    pub is_main: bool,
}

/// Result of a successful add-alt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltAdded {
    pub alt: String,
    pub main: String,
}

#[derive(Clone)]
pub struct RosterService {
    roster: RosterRepository,
    identities: IdentityRepository,
    resolver: IdentityResolver,
    applier: WriteApplier,
}

impl RosterService {
    pub fn new(
        store: Arc<dyn TableStore>,
        roster_range: SheetRange,
        identity_range: SheetRange,
    ) -> Self {
        let roster = RosterRepository::new(store.clone(), roster_range);
        let identities = IdentityRepository::new(store, identity_range);
        Self {
            resolver: IdentityResolver::new(identities.clone()),
            applier: WriteApplier::new(roster.clone(), identities.clone()),
            roster,
            identities,
        }
    }

    /// Full reconciliation of the roster against the given guild members.
    pub async fn sync_guild(&self, members: &[GuildMember]) -> RosterResult<SyncSummary> {
        let roster = self.roster.list_members().await?;
        let identities = self.identities.list_identities().await?;

        let plan = plan_guild_sync(members, &roster, &identities);
        info!(
            "Guild sync: {} members, {} roster records, {} nicknames detected, {} changes",
            members.len(),
            roster.len(),
            plan.present.len(),
            plan.changes.len()
        );

        self.applier.apply(&plan.writes()).await?;
        Ok(SyncSummary::from_plan(&plan, roster.len()))
    }

    /// Update presence for one account joining or leaving the guild.
    ///
    /// Returns the nicknames whose presence actually changed.
    pub async fn reconcile_member(
        &self,
        account_id: &str,
        display_name: &str,
        joining: bool,
    ) -> RosterResult<Vec<String>> {
        let ownership = self.resolver.resolve(account_id, display_name).await?;
        let roster = self.roster.list_members().await?;

        let changes = plan_member_sync(&ownership, &roster, joining);
        debug!(
            "Member sync for {} ({:?}): {} changes",
            account_id,
            ownership.source,
            changes.len()
        );

        let writes: Vec<SheetWrite> = changes.iter().map(|c| c.to_write()).collect();
        self.applier.apply(&writes).await?;
        Ok(changes.into_iter().map(|c| c.nickname).collect())
    }

    pub async fn link(&self, account_id: &str, name: &str) -> RosterResult<LinkOutcome> {
        let roster = self.roster.list_members().await?;
        let identity = self.identities.find_by_account(account_id).await?;

        let (outcome, writes) = ops::plan_link(&roster, identity.as_ref(), account_id, name)?;
        self.applier.apply(&writes).await?;

        info!("Linked {} -> {} ({:?})", account_id, name, outcome);
        Ok(outcome)
    }

    pub async fn add_alt(&self, account_id: &str, name: &str) -> RosterResult<AltAdded> {
        let identity = self
            .identities
            .find_by_account(account_id)
            .await?
            .ok_or(RosterError::NotLinked)?;
        let roster = self.roster.list_members().await?;

        let writes = ops::plan_add_alt(&roster, Some(&identity), name)?;
        self.applier.apply(&writes).await?;

        info!("Added alt {} for {} (main {})", name, account_id, identity.main);
        Ok(AltAdded {
            alt: name.to_string(),
            main: identity.main,
        })
    }

    pub async fn rename(&self, account_id: &str, old_name: &str, new_name: &str) -> RosterResult<String> {
        let identity = self
            .identities
            .find_by_account(account_id)
            .await?
            .ok_or(RosterError::NotLinked)?;
        let roster = self.roster.list_members().await?;

        let writes = ops::plan_rename(&roster, Some(&identity), old_name, new_name)?;
        self.applier.apply(&writes).await?;

        let new_name = new_name.trim().to_string();
        info!("Renamed {} -> {} for {}", old_name, new_name, account_id);
        Ok(new_name)
    }

    /// Returns the characters that were unlinked.
    pub async fn unlink(&self, account_id: &str) -> RosterResult<Vec<String>> {
        let identity = self
            .identities
            .find_by_account(account_id)
            .await?
            .ok_or(RosterError::IdentityNotFound)?;
        let roster = self.roster.list_members().await?;

        let (owned, writes) = ops::plan_unlink(&roster, Some(&identity))?;
        self.applier.apply(&writes).await?;

        info!("Unlinked {}: {}", account_id, owned.join(", "));
        Ok(owned)
    }

    /// The account's identity record.
    pub async fn whoami(&self, account_id: &str) -> RosterResult<IdentityRecord> {
        self.identities
            .find_by_account(account_id)
            .await?
            .ok_or(RosterError::IdentityNotFound)
    }

    /// Roster rows of the account's main then alts; missing rows are skipped.
    pub async fn owned_characters(&self, account_id: &str) -> RosterResult<Vec<OwnedCharacter>> {
        let identity = self
            .identities
            .find_by_account(account_id)
            .await?
            .ok_or(RosterError::NotLinked)?;
        let roster = self.roster.list_members().await?;

        Ok(identity
            .owned_characters()
            .iter()
            .filter_map(|name| {
                find_by_nickname(&roster, name).map(|record| OwnedCharacter {
                    record: record.clone(),
                    is_main: *name == identity.main,
                })
            })
            .collect())
    }
}
