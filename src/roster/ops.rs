//! Identity mutations: link, add-alt, rename, unlink.
//!
//! Each operation validates against snapshots of the roster and the caller's
//! identity record, then returns the ordered writes that carry it out.

use crate::common::error::{RosterError, RosterResult};
use crate::common::types::{CharacterRecord, IdentityRecord, Presence};
use crate::roster::members::find_by_nickname;
use crate::roster::plan::SheetWrite;

/// How a link request was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// A new identity row was created.
    Created,
    /// The account was already linked; its main was replaced.
    Relinked { previous_main: String },
}

fn require_character<'a>(
    roster: &'a [CharacterRecord],
    name: &str,
) -> RosterResult<&'a CharacterRecord> {
    find_by_nickname(roster, name).ok_or_else(|| RosterError::CharacterNotFound {
        name: name.to_string(),
    })
}

/// Link `name` as the account's main.
///
/// An existing identity keeps its row and alts; the previous main's roster
/// row is left as it is.
pub fn plan_link(
    roster: &[CharacterRecord],
    identity: Option<&IdentityRecord>,
    account_id: &str,
    name: &str,
) -> RosterResult<(LinkOutcome, Vec<SheetWrite>)> {
    let target = require_character(roster, name)?;

    let (outcome, identity_write) = match identity {
        Some(identity) => (
            LinkOutcome::Relinked {
                previous_main: identity.main.clone(),
            },
            SheetWrite::IdentityMain {
                row: identity.row,
                main: name.to_string(),
            },
        ),
        None => (
            LinkOutcome::Created,
            SheetWrite::CreateIdentity {
                account_id: account_id.to_string(),
                main: name.to_string(),
            },
        ),
    };

    let writes = vec![
        identity_write,
        SheetWrite::Presence {
            row: target.row,
            presence: Presence::Present,
        },
        SheetWrite::AuthStatus {
            row: target.row,
            verified: true,
        },
    ];
    Ok((outcome, writes))
}

/// Register `name` as an additional character of a linked account.
pub fn plan_add_alt(
    roster: &[CharacterRecord],
    identity: Option<&IdentityRecord>,
    name: &str,
) -> RosterResult<Vec<SheetWrite>> {
    let identity = identity.ok_or(RosterError::NotLinked)?;
    let target = require_character(roster, name)?;

    if identity.alts.iter().any(|alt| alt == name) {
        return Err(RosterError::AltConflict {
            name: name.to_string(),
        });
    }

    let mut alts = identity.alts.clone();
    alts.push(name.to_string());

    Ok(vec![
        SheetWrite::IdentityAlts {
            row: identity.row,
            alts,
        },
        SheetWrite::Presence {
            row: target.row,
            presence: Presence::Present,
        },
        SheetWrite::OwnerMain {
            row: target.row,
            main: identity.main.clone(),
        },
        SheetWrite::AuthStatus {
            row: target.row,
            verified: true,
        },
    ])
}

/// Check a new character name before it is written anywhere.
pub fn validate_new_name(name: &str) -> RosterResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RosterError::InvalidName {
            message: "name must not be empty".to_string(),
        });
    }
    // Alt lists are stored comma-joined.
    if name.contains(',') {
        return Err(RosterError::InvalidName {
            message: "name must not contain ','".to_string(),
        });
    }
    Ok(name)
}

/// Rename one of the account's characters.
///
/// Renaming the main also repoints every alt row's owner column.
pub fn plan_rename(
    roster: &[CharacterRecord],
    identity: Option<&IdentityRecord>,
    old_name: &str,
    new_name: &str,
) -> RosterResult<Vec<SheetWrite>> {
    let identity = identity.ok_or(RosterError::NotLinked)?;

    let is_main = identity.main == old_name;
    let is_alt = identity.alts.iter().any(|alt| alt == old_name);
    if !is_main && !is_alt {
        return Err(RosterError::NotOwner {
            name: old_name.to_string(),
        });
    }

    let new_name = validate_new_name(new_name)?;
    // Nicknames identify roster rows, so they must stay unique.
    if find_by_nickname(roster, new_name).is_some() {
        return Err(RosterError::InvalidName {
            message: format!("'{}' is already in the roster", new_name),
        });
    }
    let target = require_character(roster, old_name)?;

    let mut writes = vec![SheetWrite::Nickname {
        row: target.row,
        nickname: new_name.to_string(),
    }];

    if is_main {
        writes.push(SheetWrite::IdentityMain {
            row: identity.row,
            main: new_name.to_string(),
        });
        writes.extend(identity.alts.iter().filter_map(|alt| {
            find_by_nickname(roster, alt).map(|record| SheetWrite::OwnerMain {
                row: record.row,
                main: new_name.to_string(),
            })
        }));
    } else {
        let alts = identity
            .alts
            .iter()
            .map(|alt| {
                if alt == old_name {
                    new_name.to_string()
                } else {
                    alt.clone()
                }
            })
            .collect();
        writes.push(SheetWrite::IdentityAlts {
            row: identity.row,
            alts,
        });
    }

    Ok(writes)
}

/// Remove the account's link: mark its characters absent and unverified,
/// then blank the identity row.
pub fn plan_unlink(
    roster: &[CharacterRecord],
    identity: Option<&IdentityRecord>,
) -> RosterResult<(Vec<String>, Vec<SheetWrite>)> {
    let identity = identity.ok_or(RosterError::IdentityNotFound)?;
    let owned = identity.owned_characters();

    let mut writes = Vec::new();
    for name in &owned {
        if let Some(record) = find_by_nickname(roster, name) {
            if record.is_present() {
                writes.push(SheetWrite::Presence {
                    row: record.row,
                    presence: Presence::Absent,
                });
            }
            writes.push(SheetWrite::AuthStatus {
                row: record.row,
                verified: false,
            });
        }
    }
    writes.push(SheetWrite::ClearIdentity { row: identity.row });

    Ok((owned, writes))
}
