//! Error types for the application.

use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Errors from the external tabular store (transport, auth, API).
///
/// These are passed through to callers unmodified; nothing retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Sheets request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid service account credentials: {message}")]
    Credentials { message: String },

    #[error("Failed to obtain access token: {message}")]
    Token { message: String },
}

/// Errors from roster and identity operations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Character '{name}' was not found in the roster sheet.")]
    CharacterNotFound { name: String },

    #[error("No linked characters found for this account.")]
    IdentityNotFound,

    #[error("Link your main character first with `/link`.")]
    NotLinked,

    #[error("'{name}' is not one of your characters.")]
    NotOwner { name: String },

    #[error("'{name}' is already registered as an alt.")]
    AltConflict { name: String },

    #[error("Invalid character name: {message}")]
    InvalidName { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from the character-stats lookup API.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Character not found.")]
    CharacterNotFound,

    #[error("Stats request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid stats URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for roster operations.
pub type RosterResult<T> = std::result::Result<T, RosterError>;
