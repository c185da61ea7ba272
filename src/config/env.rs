//! Environment variable overrides for configuration.
//!
//! Supports overriding config values with environment variables:
//! - `QUARTERMASTER_DISCORD_TOKEN` - Discord bot token
//! - `QUARTERMASTER_GUILD_ID` - Guild to register commands on
//! - `QUARTERMASTER_SITE_URL` - Link returned by `/site`
//! - `QUARTERMASTER_SPREADSHEET_ID` - Spreadsheet holding the roster
//! - `QUARTERMASTER_GOOGLE_CREDENTIALS` - Inline service-account JSON
//! - `QUARTERMASTER_GOOGLE_CREDENTIALS_PATH` - Service-account key file

use std::env;

use crate::config::types::Config;

/// Environment variable prefix for all config overrides.
const ENV_PREFIX: &str = "QUARTERMASTER";

/// Apply environment variable overrides to a config.
///
/// Hosted deployments usually inject the token and the service-account
/// key this way instead of shipping them in the config file.
pub fn apply_env_overrides(mut config: Config) -> Config {
    if let Some(token) = env_override("DISCORD_TOKEN") {
        config.discord.token = token;
    }
    if let Some(guild_id) = env_override("GUILD_ID") {
        if let Ok(id) = guild_id.parse() {
            config.discord.guild_id = Some(id);
        }
    }
    if let Some(url) = env_override("SITE_URL") {
        config.discord.site_url = Some(url);
    }

    if let Some(id) = env_override("SPREADSHEET_ID") {
        config.sheets.spreadsheet_id = id;
    }
    if let Some(json) = env_override("GOOGLE_CREDENTIALS") {
        config.sheets.credentials_json = Some(json);
    }
    if let Some(path) = env_override("GOOGLE_CREDENTIALS_PATH") {
        config.sheets.credentials_path = Some(path);
    }

    config
}

/// Value of `QUARTERMASTER_<name>`; set-but-empty counts as unset.
fn env_override(name: &str) -> Option<String> {
    env::var(format!("{}_{}", ENV_PREFIX, name))
        .ok()
        .filter(|value| !value.is_empty())
}

/// Check if any required environment variables are set but empty.
///
/// Returns a list of variable names that are set but empty.
pub fn check_empty_env_vars() -> Vec<String> {
    let vars = [
        format!("{}_DISCORD_TOKEN", ENV_PREFIX),
        format!("{}_SPREADSHEET_ID", ENV_PREFIX),
        format!("{}_GOOGLE_CREDENTIALS", ENV_PREFIX),
    ];

    vars.into_iter()
        .filter(|var| env::var(var).map(|v| v.is_empty()).unwrap_or(false))
        .collect()
}

/// Get the config file path from environment or use default.
///
/// Checks `QUARTERMASTER_CONFIG`, otherwise returns "quartermaster.conf".
pub fn get_config_path() -> String {
    env::var(format!("{}_CONFIG", ENV_PREFIX))
        .unwrap_or_else(|_| "quartermaster.conf".to_string())
}
