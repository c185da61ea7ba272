//! Shared types used across the application.

/// 1-based sheet row number, used as the durable identifier of a row.
pub type RowPosition = u32;

/// Presence flag stored in the roster's Discord column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    /// `"O"`: the owning account is in the guild.
    Present,
    /// `"X"`: the owning account is not in the guild.
    Absent,
}

impl Presence {
    /// Parse a roster cell. Only an exact `O`/`X` counts; anything else is unset.
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell {
            "O" => Some(Self::Present),
            "X" => Some(Self::Absent),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> &'static str {
        match self {
            Self::Present => "O",
            Self::Absent => "X",
        }
    }

    pub fn from_joining(joining: bool) -> Self {
        if joining {
            Self::Present
        } else {
            Self::Absent
        }
    }
}

/// One character row of the roster sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterRecord {
    pub row: RowPosition,
    pub rank: String,
    pub nickname: String,
    pub class_name: String,
    pub age: String,
    pub presence: Option<Presence>,
    pub kakao_contact: String,
    pub max_combat_score: String,
    pub combat_score: String,
    pub combat_power: String,
    /// Nickname of the main character owning this row; empty for mains.
    pub owner_main: String,
    pub verified: bool,
}

impl CharacterRecord {
    pub fn is_present(&self) -> bool {
        self.presence == Some(Presence::Present)
    }
}

/// One row of the identity sheet: a Discord account and the characters it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityRecord {
    pub row: RowPosition,
    pub account_id: String,
    pub main: String,
    pub alts: Vec<String>,
}

impl IdentityRecord {
    /// Main followed by alts, in sheet order.
    pub fn owned_characters(&self) -> Vec<String> {
        let mut owned = Vec::with_capacity(self.alts.len() + 1);
        owned.push(self.main.clone());
        owned.extend(self.alts.iter().cloned());
        owned
    }

    pub fn owns(&self, nickname: &str) -> bool {
        self.main == nickname || self.alts.iter().any(|alt| alt == nickname)
    }
}

/// A Discord guild member as seen by the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildMember {
    pub account_id: String,
    /// Guild nickname, falling back to the username.
    pub display_name: String,
    pub bot: bool,
}

/// Where an account's character ownership was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipSource {
    /// An identity record exists for the account.
    Linked,
    /// Parsed from the `character/year/class` display name convention.
    DisplayName,
}

/// Characters owned by one Discord account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub main: Option<String>,
    pub alts: Vec<String>,
    pub source: OwnershipSource,
}

impl Ownership {
    /// Main then alts, skipping repeats.
    pub fn nicknames(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.alts.len() + 1);
        for name in self.main.iter().chain(self.alts.iter()) {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_cells() {
        assert_eq!(Presence::from_cell("O"), Some(Presence::Present));
        assert_eq!(Presence::from_cell("X"), Some(Presence::Absent));
        assert_eq!(Presence::from_cell(" X "), None);
        assert_eq!(Presence::from_cell(""), None);
        assert_eq!(Presence::from_cell("o"), None);
        assert_eq!(Presence::from_joining(false).as_cell(), "X");
    }

    #[test]
    fn test_ownership_nicknames_dedup() {
        let ownership = Ownership {
            main: Some("Aria".to_string()),
            alts: vec!["Beta".to_string(), "Aria".to_string(), "Beta".to_string()],
            source: OwnershipSource::Linked,
        };
        assert_eq!(ownership.nicknames(), vec!["Aria", "Beta"]);
    }

    #[test]
    fn test_identity_owns() {
        let identity = IdentityRecord {
            row: 2,
            account_id: "u1".to_string(),
            main: "Aria".to_string(),
            alts: vec!["Beta".to_string()],
        };
        assert!(identity.owns("Aria"));
        assert!(identity.owns("Beta"));
        assert!(!identity.owns("Gamma"));
        assert_eq!(identity.owned_characters(), vec!["Aria", "Beta"]);
    }
}
