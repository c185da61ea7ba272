//! Configuration type definitions.

use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub discord: DiscordConfig,
    pub sheets: SheetsConfig,
    pub stats: Option<StatsConfig>,
}

/// Discord bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    pub token: String,
    /// Register commands on this guild only (instant) instead of globally.
    pub guild_id: Option<u64>,
    /// Link returned by `/site`.
    pub site_url: Option<String>,
}

/// Spreadsheet location and service-account credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    /// Path to a service-account JSON key file.
    pub credentials_path: Option<String>,
    /// Inline service-account JSON (usually provided through the environment).
    pub credentials_json: Option<String>,
    /// Roster sheet name; `None` addresses the first sheet.
    pub roster_sheet: Option<String>,
    #[serde(default = "default_identity_sheet")]
    pub identity_sheet: String,
}

/// External character-stats lookup API.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    pub base_url: String,
    pub server: String,
    pub race: String,
}

fn default_identity_sheet() -> String {
    "Auth".to_string()
}
