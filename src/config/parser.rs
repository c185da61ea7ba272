//! Configuration file parsing (HOCON format).

use std::path::Path;

use hocon::HoconLoader;

use crate::common::error::ConfigError;
use crate::config::types::Config;

/// Load configuration from a HOCON file.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    HoconLoader::new()
        .load_file(path)
        .map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
        })?
        .resolve()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}

/// Load configuration from a HOCON string.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    HoconLoader::new()
        .load_str(content)
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?
        .resolve()
        .map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_minimal_config() {
        let config = load_config_str(
            r#"
            discord {
                token = "abc"
            }
            sheets {
                spreadsheet_id = "sheet-123"
                credentials_path = "service-account.json"
            }
            "#,
        )
        .unwrap();

        assert_eq!(config.discord.token, "abc");
        assert_eq!(config.discord.guild_id, None);
        assert_eq!(config.sheets.spreadsheet_id, "sheet-123");
        assert_eq!(config.sheets.identity_sheet, "Auth");
        assert!(config.sheets.roster_sheet.is_none());
        assert!(config.stats.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let config = load_config_str(
            r#"
            discord {
                token = "abc"
                guild_id = 1234
                site_url = "https://example.com"
            }
            sheets {
                spreadsheet_id = "sheet-123"
                roster_sheet = "Roster"
                identity_sheet = "Links"
            }
            stats {
                base_url = "https://stats.example.com"
                server = "Zikel"
                race = "Asmodian"
            }
            "#,
        )
        .unwrap();

        assert_eq!(config.discord.guild_id, Some(1234));
        assert_eq!(config.sheets.roster_sheet.as_deref(), Some("Roster"));
        assert_eq!(config.sheets.identity_sheet, "Links");
        assert_eq!(config.stats.unwrap().server, "Zikel");
    }

    #[test]
    fn test_missing_section_fails() {
        let result = load_config_str(r#"discord { token = "abc" }"#);
        assert!(result.is_err());
    }
}
