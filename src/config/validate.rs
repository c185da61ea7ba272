//! Configuration validation.
//!
//! Validates configuration values and provides helpful error messages.

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Validate a configuration and return detailed errors.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    // Discord
    if config.discord.token.is_empty() {
        errors.push("discord.token is required".to_string());
    }
    if config.discord.token == "YOUR_DISCORD_TOKEN_HERE" {
        errors.push("discord.token has not been configured (still using placeholder)".to_string());
    }
    if let Some(ref url) = config.discord.site_url {
        if !is_http_url(url) {
            errors.push(format!("discord.site_url '{}' must be an http(s) URL", url));
        }
    }

    // Sheets
    if config.sheets.spreadsheet_id.trim().is_empty() {
        errors.push("sheets.spreadsheet_id is required".to_string());
    }
    let has_path = config
        .sheets
        .credentials_path
        .as_ref()
        .is_some_and(|p| !p.trim().is_empty());
    let has_json = config
        .sheets
        .credentials_json
        .as_ref()
        .is_some_and(|j| !j.trim().is_empty());
    if !has_path && !has_json {
        errors.push(
            "sheets.credentials_path or sheets.credentials_json is required".to_string(),
        );
    }
    if config.sheets.identity_sheet.trim().is_empty() {
        errors.push("sheets.identity_sheet must not be empty".to_string());
    }
    if let Some(ref roster) = config.sheets.roster_sheet {
        if roster.trim().is_empty() {
            errors.push("sheets.roster_sheet must not be empty when set".to_string());
        }
        if roster == &config.sheets.identity_sheet {
            errors.push("sheets.roster_sheet and sheets.identity_sheet must differ".to_string());
        }
    }

    // Stats lookup
    if let Some(ref stats) = config.stats {
        if !is_http_url(&stats.base_url) {
            errors.push(format!("stats.base_url '{}' must be an http(s) URL", stats.base_url));
        }
        if stats.server.is_empty() {
            errors.push("stats.server is required".to_string());
        }
        if stats.race.is_empty() {
            errors.push("stats.race is required".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            message: errors.join("\n"),
        })
    }
}

fn is_http_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|url| url.scheme() == "http" || url.scheme() == "https")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::*;

    fn make_valid_config() -> Config {
        Config {
            discord: DiscordConfig {
                token: "valid_token_here".to_string(),
                guild_id: Some(123456789),
                site_url: Some("https://guild.example.com".to_string()),
            },
            sheets: SheetsConfig {
                spreadsheet_id: "1abcDEF".to_string(),
                credentials_path: Some("service-account.json".to_string()),
                credentials_json: None,
                roster_sheet: None,
                identity_sheet: "Auth".to_string(),
            },
            stats: Some(StatsConfig {
                base_url: "https://stats.example.com".to_string(),
                server: "Zikel".to_string(),
                race: "Asmodian".to_string(),
            }),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        let config = make_valid_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_token_fails() {
        let mut config = make_valid_config();
        config.discord.token = String::new();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("discord.token"));
    }

    #[test]
    fn test_placeholder_token_fails() {
        let mut config = make_valid_config();
        config.discord.token = "YOUR_DISCORD_TOKEN_HERE".to_string();

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("placeholder"));
    }

    #[test]
    fn test_missing_credentials_fails() {
        let mut config = make_valid_config();
        config.sheets.credentials_path = None;
        config.sheets.credentials_json = Some("  ".to_string());

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("credentials"));
    }

    #[test]
    fn test_inline_credentials_pass() {
        let mut config = make_valid_config();
        config.sheets.credentials_path = None;
        config.sheets.credentials_json = Some("{}".to_string());

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_same_sheet_names_fail() {
        let mut config = make_valid_config();
        config.sheets.roster_sheet = Some("Auth".to_string());

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("must differ"));
    }

    #[test]
    fn test_bad_stats_url_fails() {
        let mut config = make_valid_config();
        if let Some(ref mut stats) = config.stats {
            stats.base_url = "ftp://nope".to_string();
        }

        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("stats.base_url"));
    }

    #[test]
    fn test_all_errors_reported() {
        let mut config = make_valid_config();
        config.discord.token = String::new();
        config.sheets.spreadsheet_id = String::new();

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("discord.token"));
        assert!(message.contains("sheets.spreadsheet_id"));
    }
}
