//! Presence reconciliation between guild membership and the roster sheet.
//!
//! The roster's presence column records what the last sync saw. Each run
//! recomputes the desired presence from current membership and emits writes
//! only where the sheet disagrees, so repeated runs are no-ops.

use std::collections::{HashMap, HashSet};

use crate::common::types::{
    CharacterRecord, GuildMember, IdentityRecord, Ownership, Presence, RowPosition,
};
use crate::roster::members::find_by_nickname;
use crate::roster::plan::SheetWrite;
use crate::roster::resolver::resolve_with;

/// A presence flip for one roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceChange {
    pub row: RowPosition,
    pub nickname: String,
    pub presence: Presence,
}

impl PresenceChange {
    pub fn to_write(&self) -> SheetWrite {
        SheetWrite::Presence {
            row: self.row,
            presence: self.presence,
        }
    }
}

/// Result of diffing the whole roster against guild membership.
#[derive(Debug, Clone, Default)]
pub struct GuildSyncPlan {
    /// Every nickname owned by a current (non-bot) guild member.
    pub present: HashSet<String>,
    /// Rows whose presence disagrees with `present`, in roster order.
    pub changes: Vec<PresenceChange>,
}

impl GuildSyncPlan {
    pub fn writes(&self) -> Vec<SheetWrite> {
        self.changes.iter().map(PresenceChange::to_write).collect()
    }
}

/// Counts and changed nicknames reported after a full sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub updated: usize,
    pub joined: Vec<String>,
    pub left: Vec<String>,
    /// Roster records examined.
    pub total: usize,
    /// Distinct nicknames detected on Discord.
    pub discord_count: usize,
}

impl SyncSummary {
    pub fn from_plan(plan: &GuildSyncPlan, total: usize) -> Self {
        let mut summary = Self {
            updated: plan.changes.len(),
            total,
            discord_count: plan.present.len(),
            ..Self::default()
        };
        for change in &plan.changes {
            match change.presence {
                Presence::Present => summary.joined.push(change.nickname.clone()),
                Presence::Absent => summary.left.push(change.nickname.clone()),
            }
        }
        summary
    }
}

/// Diff the full roster against current guild membership.
pub fn plan_guild_sync(
    members: &[GuildMember],
    roster: &[CharacterRecord],
    identities: &[IdentityRecord],
) -> GuildSyncPlan {
    let mut linked: HashMap<&str, &IdentityRecord> = HashMap::new();
    for identity in identities.iter().filter(|i| !i.main.is_empty()) {
        linked.entry(identity.account_id.as_str()).or_insert(identity);
    }

    let present: HashSet<String> = members
        .iter()
        .filter(|member| !member.bot)
        .flat_map(|member| {
            let identity = linked.get(member.account_id.as_str()).copied();
            resolve_with(identity, &member.display_name).nicknames()
        })
        .collect();

    let changes = roster
        .iter()
        .filter_map(|record| {
            let desired = present.contains(&record.nickname);
            let actual = record.is_present();
            let presence = match (desired, actual) {
                (true, false) => Presence::Present,
                (false, true) => Presence::Absent,
                _ => return None,
            };
            Some(PresenceChange {
                row: record.row,
                nickname: record.nickname.clone(),
                presence,
            })
        })
        .collect();

    GuildSyncPlan { present, changes }
}

/// Presence changes for one account joining or leaving.
///
/// Only rows whose current value differs from the target are included; an
/// empty result is normal (duplicate events, already consistent sheet).
pub fn plan_member_sync(
    ownership: &Ownership,
    roster: &[CharacterRecord],
    joining: bool,
) -> Vec<PresenceChange> {
    let target = Presence::from_joining(joining);

    ownership
        .nicknames()
        .into_iter()
        .filter_map(|nickname| {
            let record = find_by_nickname(roster, &nickname)?;
            (record.presence != Some(target)).then(|| PresenceChange {
                row: record.row,
                nickname,
                presence: target,
            })
        })
        .collect()
}
