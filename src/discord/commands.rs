//! Slash command definitions and parsing.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

/// A parsed slash command with its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Ping,
    Site,
    SyncGuild,
    Link { character: String },
    AddAlt { character: String },
    Rename { old: String, new: String },
    Unlink,
    WhoAmI,
    Score,
    Power,
    Lookup { character: String },
}

impl BotCommand {
    /// Build a command from its name and `(option, value)` string pairs.
    ///
    /// Returns `None` for unknown commands or when a required option is missing.
    pub fn from_parts(name: &str, options: &[(&str, &str)]) -> Option<Self> {
        let option = |key: &str| {
            options
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let command = match name {
            "ping" => Self::Ping,
            "site" => Self::Site,
            "sync-guild" => Self::SyncGuild,
            "link" => Self::Link { character: option("character")? },
            "add-alt" => Self::AddAlt { character: option("character")? },
            "rename" => Self::Rename {
                old: option("old")?,
                // Validated (and trimmed) by the rename operation itself.
                new: options
                    .iter()
                    .find(|(name, _)| *name == "new")
                    .map(|(_, value)| value.to_string())?,
            },
            "unlink" => Self::Unlink,
            "whoami" => Self::WhoAmI,
            "score" => Self::Score,
            "power" => Self::Power,
            "lookup" => Self::Lookup { character: option("character")? },
            _ => return None,
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::Site => "site",
            Self::SyncGuild => "sync-guild",
            Self::Link { .. } => "link",
            Self::AddAlt { .. } => "add-alt",
            Self::Rename { .. } => "rename",
            Self::Unlink => "unlink",
            Self::WhoAmI => "whoami",
            Self::Score => "score",
            Self::Power => "power",
            Self::Lookup { .. } => "lookup",
        }
    }

    /// Whether the reply is visible only to the invoking user.
    pub fn is_ephemeral(&self) -> bool {
        !matches!(self, Self::Ping | Self::Site | Self::SyncGuild)
    }
}

fn character_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "character", description).required(true)
}

/// All slash commands registered at startup.
pub fn definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("ping").description("Check the bot's response time"),
        CreateCommand::new("site").description("Show the guild website"),
        CreateCommand::new("sync-guild")
            .description("Sync roster presence with the current guild members"),
        CreateCommand::new("link")
            .description("Link your main character to your Discord account")
            .add_option(character_option("Main character nickname")),
        CreateCommand::new("add-alt")
            .description("Register an alt character under your main")
            .add_option(character_option("Alt character nickname")),
        CreateCommand::new("rename")
            .description("Rename one of your characters")
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "old", "Current nickname")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(CommandOptionType::String, "new", "New nickname")
                    .required(true),
            ),
        CreateCommand::new("unlink").description("Remove the link between your account and characters"),
        CreateCommand::new("whoami").description("Show your linked characters"),
        CreateCommand::new("score").description("Show combat scores of your characters"),
        CreateCommand::new("power").description("Show combat power of your characters"),
        CreateCommand::new("lookup")
            .description("Look up a character's live stats")
            .add_option(character_option("Character nickname")),
    ]
}
