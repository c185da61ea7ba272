//! Reply text for slash commands.

use serde_json::{Map, Value};

use crate::common::error::{RosterError, StatsError};
use crate::common::types::IdentityRecord;
use crate::roster::{AltAdded, LinkOutcome, OwnedCharacter, SyncSummary};

/// Discord's message length limit.
pub const MAX_MESSAGE_LENGTH: usize = 2000;

const STORE_FAILURE: &str = "Could not reach the roster sheet. Please try again later.";

pub fn ping(latency_ms: i64) -> String {
    format!("Pong! Response time: {}ms", latency_ms.max(0))
}

pub fn unknown_command(name: &str) -> String {
    format!("❌ `/{}` is not a known command or is missing an option.", name)
}

pub fn site(url: Option<&str>) -> String {
    match url {
        Some(url) => format!("**Guild website**\n{}", url),
        None => "No guild website is configured.".to_string(),
    }
}

pub fn sync_summary(summary: &SyncSummary) -> String {
    let mut message = String::from("**Sync complete!**\n");
    message.push_str(&format!("Roster members: {}\n", summary.total));
    message.push_str(&format!("Detected on Discord: {}\n", summary.discord_count));
    message.push_str(&format!("Changes: {}\n", summary.updated));

    if !summary.joined.is_empty() {
        message.push_str(&format!("\n✅ Present: {}", summary.joined.join(", ")));
    }
    if !summary.left.is_empty() {
        message.push_str(&format!("\n❌ Absent: {}", summary.left.join(", ")));
    }
    if summary.updated == 0 {
        message.push_str("\nNo changes");
    }
    truncate(message)
}

pub fn link(name: &str, outcome: &LinkOutcome) -> String {
    match outcome {
        LinkOutcome::Created => format!("✅ **{}** is now linked to your account!", name),
        LinkOutcome::Relinked { .. } => format!("✅ Your main character is now **{}**.", name),
    }
}

pub fn add_alt(added: &AltAdded) -> String {
    format!("✅ Alt **{}** added! (main: {})", added.alt, added.main)
}

pub fn rename(old_name: &str, new_name: &str) -> String {
    format!("✅ **{}** → **{}** renamed!", old_name, new_name)
}

pub fn unlink(owned: &[String]) -> String {
    format!("✅ Your link has been removed. ({})", owned.join(", "))
}

pub fn whoami(identity: &IdentityRecord) -> String {
    let mut message = String::from("**Your linked characters**\n");
    message.push_str(&format!("Main: **{}**\n", identity.main));
    if identity.alts.is_empty() {
        message.push_str("Alts: none\n");
    } else {
        message.push_str(&format!("Alts: {}\n", identity.alts.join(", ")));
    }
    message
}

fn label(character: &OwnedCharacter) -> &'static str {
    if character.is_main {
        "Main"
    } else {
        "Alt"
    }
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

pub fn score(characters: &[OwnedCharacter]) -> String {
    let mut message = String::from("**Combat score**\n");
    for character in characters {
        message.push_str(&format!(
            "{} **{}**: {} (max: {})\n",
            label(character),
            character.record.nickname,
            or_dash(&character.record.combat_score),
            or_dash(&character.record.max_combat_score),
        ));
    }
    truncate(message)
}

pub fn power(characters: &[OwnedCharacter]) -> String {
    let mut message = String::from("**Combat power**\n");
    for character in characters {
        message.push_str(&format!(
            "{} **{}**: {}\n",
            label(character),
            character.record.nickname,
            or_dash(&character.record.combat_power),
        ));
    }
    truncate(message)
}

/// Scalar fields of a stats lookup, one per line; nested values are skipped.
pub fn lookup(name: &str, data: &Map<String, Value>) -> String {
    let mut message = format!("**{}**\n", name);
    let mut fields = 0;
    for (key, value) in data {
        let text = match value {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => continue,
        };
        message.push_str(&format!("{}: {}\n", key, text));
        fields += 1;
    }
    if fields == 0 {
        message.push_str("No stats available.");
    }
    truncate(message)
}

/// User-visible message for a roster failure.
pub fn roster_error(error: &RosterError) -> String {
    match error {
        RosterError::Store(_) => STORE_FAILURE.to_string(),
        other => format!("❌ {}", other),
    }
}

pub fn stats_error(error: &StatsError) -> String {
    match error {
        StatsError::CharacterNotFound => format!("❌ {}", error),
        _ => "Could not reach the stats service. Please try again later.".to_string(),
    }
}

/// Cut a message to Discord's length limit on a character boundary.
pub fn truncate(message: String) -> String {
    if message.chars().count() <= MAX_MESSAGE_LENGTH {
        return message;
    }
    let mut cut: String = message.chars().take(MAX_MESSAGE_LENGTH - 1).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::StoreError;
    use crate::common::types::CharacterRecord;
    use serde_json::json;

    fn owned(nickname: &str, is_main: bool, score: &str, max: &str, power: &str) -> OwnedCharacter {
        OwnedCharacter {
            record: CharacterRecord {
                nickname: nickname.to_string(),
                combat_score: score.to_string(),
                max_combat_score: max.to_string(),
                combat_power: power.to_string(),
                ..CharacterRecord::default()
            },
            is_main,
        }
    }

    #[test]
    fn test_ping_and_unknown_command() {
        assert_eq!(ping(42), "Pong! Response time: 42ms");
        assert_eq!(ping(-5), "Pong! Response time: 0ms");
        assert!(unknown_command("frobnicate").contains("`/frobnicate`"));
    }

    #[test]
    fn test_sync_summary_lists_changes() {
        let summary = SyncSummary {
            updated: 2,
            joined: vec!["Aria".to_string()],
            left: vec!["Beta".to_string()],
            total: 10,
            discord_count: 4,
        };
        let message = sync_summary(&summary);
        assert!(message.contains("Roster members: 10"));
        assert!(message.contains("Detected on Discord: 4"));
        assert!(message.contains("✅ Present: Aria"));
        assert!(message.contains("❌ Absent: Beta"));
        assert!(!message.contains("No changes"));
    }

    #[test]
    fn test_sync_summary_without_changes() {
        let message = sync_summary(&SyncSummary::default());
        assert!(message.ends_with("No changes"));
        assert!(!message.contains("Present:"));
    }

    #[test]
    fn test_link_replies() {
        assert!(link("Aria", &LinkOutcome::Created).contains("linked"));
        let relinked = LinkOutcome::Relinked { previous_main: "Old".to_string() };
        assert!(link("Aria", &relinked).contains("main character is now **Aria**"));
    }

    #[test]
    fn test_whoami_without_alts() {
        let identity = IdentityRecord {
            row: 2,
            account_id: "u1".to_string(),
            main: "Aria".to_string(),
            alts: vec![],
        };
        assert!(whoami(&identity).contains("Alts: none"));
    }

    #[test]
    fn test_score_and_power() {
        let characters = vec![owned("Aria", true, "1200", "1500", ""), owned("Beta", false, "", "", "800")];

        let scores = score(&characters);
        assert!(scores.contains("Main **Aria**: 1200 (max: 1500)"));
        assert!(scores.contains("Alt **Beta**: - (max: -)"));

        let powers = power(&characters);
        assert!(powers.contains("Main **Aria**: -"));
        assert!(powers.contains("Alt **Beta**: 800"));
    }

    #[test]
    fn test_lookup_skips_nested_fields() {
        let data = json!({"level": 45, "className": "Warrior", "equipment": [1, 2]});
        let message = lookup("Aria", data.as_object().unwrap());
        assert!(message.contains("level: 45"));
        assert!(message.contains("className: Warrior"));
        assert!(!message.contains("equipment"));

        assert!(lookup("Aria", &Map::new()).contains("No stats available."));
    }

    #[test]
    fn test_error_messages() {
        let not_found = RosterError::CharacterNotFound { name: "Aria".to_string() };
        assert_eq!(
            roster_error(&not_found),
            "❌ Character 'Aria' was not found in the roster sheet."
        );

        let store = RosterError::Store(StoreError::Api { status: 500, message: "boom".to_string() });
        assert_eq!(roster_error(&store), STORE_FAILURE);

        assert_eq!(stats_error(&StatsError::CharacterNotFound), "❌ Character not found.");
    }

    #[test]
    fn test_truncate_long_message() {
        let long = "가".repeat(MAX_MESSAGE_LENGTH + 10);
        let cut = truncate(long);
        assert_eq!(cut.chars().count(), MAX_MESSAGE_LENGTH);
        assert!(cut.ends_with('…'));
    }
}
