//! Character ownership resolution for Discord accounts.

use crate::common::error::StoreResult;
use crate::common::types::{IdentityRecord, Ownership, OwnershipSource};
use crate::roster::identities::IdentityRepository;

/// Extract the character name from a `character/year/class` display name.
///
/// Purely syntactic: the first `/`-separated segment, trimmed. Returns `None`
/// when that segment is empty.
pub fn parse_display_name(display_name: &str) -> Option<String> {
    let candidate = display_name.split('/').next().unwrap_or("").trim();
    if candidate.is_empty() {
        None
    } else {
        Some(candidate.to_string())
    }
}

/// Ownership for an account, given its identity record (if any).
///
/// A linked identity with a non-empty main always wins; otherwise the display
/// name is parsed.
pub fn resolve_with(identity: Option<&IdentityRecord>, display_name: &str) -> Ownership {
    match identity {
        Some(identity) if !identity.main.is_empty() => Ownership {
            main: Some(identity.main.clone()),
            alts: identity.alts.clone(),
            source: OwnershipSource::Linked,
        },
        _ => Ownership {
            main: parse_display_name(display_name),
            alts: Vec::new(),
            source: OwnershipSource::DisplayName,
        },
    }
}

/// Resolves ownership by looking up the identity sheet.
#[derive(Clone)]
pub struct IdentityResolver {
    identities: IdentityRepository,
}

impl IdentityResolver {
    pub fn new(identities: IdentityRepository) -> Self {
        Self { identities }
    }

    pub async fn resolve(&self, account_id: &str, display_name: &str) -> StoreResult<Ownership> {
        let identity = self.identities.find_by_account(account_id).await?;
        Ok(resolve_with(identity.as_ref(), display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::sheets::memory::MemoryStore;
    use crate::sheets::SheetRange;

    #[test]
    fn test_parse_display_name() {
        assert_eq!(parse_display_name("Aria/1999/Warrior").as_deref(), Some("Aria"));
        assert_eq!(parse_display_name("  Aria  / 99").as_deref(), Some("Aria"));
        assert_eq!(parse_display_name("Aria").as_deref(), Some("Aria"));
        assert_eq!(parse_display_name("/1999/Warrior"), None);
        assert_eq!(parse_display_name(""), None);
        assert_eq!(parse_display_name("   "), None);
    }

    #[test]
    fn test_linked_identity_wins() {
        let identity = IdentityRecord {
            row: 2,
            account_id: "u1".to_string(),
            main: "Aria".to_string(),
            alts: vec!["Beta".to_string()],
        };

        let ownership = resolve_with(Some(&identity), "Other/2000/Mage");
        assert_eq!(ownership.source, OwnershipSource::Linked);
        assert_eq!(ownership.main.as_deref(), Some("Aria"));
        assert_eq!(ownership.alts, vec!["Beta"]);
    }

    #[test]
    fn test_identity_without_main_falls_back() {
        let identity = IdentityRecord {
            row: 2,
            account_id: "u1".to_string(),
            main: String::new(),
            alts: vec!["Beta".to_string()],
        };

        let ownership = resolve_with(Some(&identity), "Other/2000/Mage");
        assert_eq!(ownership.source, OwnershipSource::DisplayName);
        assert_eq!(ownership.main.as_deref(), Some("Other"));
        assert!(ownership.alts.is_empty());
    }

    #[tokio::test]
    async fn test_resolver_reads_identity_sheet() {
        let store = Arc::new(MemoryStore::new().with_sheet(
            "Auth",
            vec![vec!["id", "main", "alts"], vec!["u1", "Aria", "Beta"]],
        ));
        let resolver = IdentityResolver::new(IdentityRepository::new(
            store,
            SheetRange::named("Auth"),
        ));

        let linked = resolver.resolve("u1", "ignored").await.unwrap();
        assert_eq!(linked.nicknames(), vec!["Aria", "Beta"]);

        let unlinked = resolver.resolve("u9", "Gamma/1990/Ranger").await.unwrap();
        assert_eq!(unlinked.source, OwnershipSource::DisplayName);
        assert_eq!(unlinked.nicknames(), vec!["Gamma"]);
    }
}
