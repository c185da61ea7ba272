//! Discord bot integration.
//!
//! Registers the slash commands, answers them from the roster sheet, and
//! keeps presence in sync as members join and leave.

pub mod client;
pub mod commands;
pub mod format;
pub mod handler;

pub use client::{DiscordBot, DiscordBotBuilder};
pub use handler::RosterHandler;
