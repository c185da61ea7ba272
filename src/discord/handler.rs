//! Slash command and membership event handling.
//!
//! Each event is handled on its own task; errors are caught here, logged and
//! turned into a reply. Nothing is retried.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serenity::all::{
    Command, CommandInteraction, Context, EditInteractionResponse, GuildId, Member, Ready, User,
};
use tracing::{debug, error, info, warn};

use crate::common::types::GuildMember;
use crate::discord::commands::{definitions, BotCommand};
use crate::discord::format;
use crate::roster::RosterService;
use crate::stats::StatsClient;

/// Routes Discord events to the roster service and the stats client.
#[derive(Clone)]
pub struct RosterHandler {
    roster: RosterService,
    stats: Option<Arc<StatsClient>>,
    site_url: Option<String>,
    guild_id: Option<GuildId>,
}

impl RosterHandler {
    pub fn new(
        roster: RosterService,
        stats: Option<StatsClient>,
        site_url: Option<String>,
        guild_id: Option<u64>,
    ) -> Self {
        Self {
            roster,
            stats: stats.map(Arc::new),
            site_url,
            guild_id: guild_id.map(GuildId::new),
        }
    }

    /// Register slash commands: per guild when one is configured, else globally.
    pub async fn handle_ready(&self, ctx: &Context, ready: &Ready) {
        info!("Discord bot connected as {}", ready.user.name);

        let result = match self.guild_id {
            Some(guild_id) => guild_id.set_commands(&ctx.http, definitions()).await,
            None => Command::set_global_commands(&ctx.http, definitions()).await,
        };
        match result {
            Ok(commands) => info!("Registered {} slash commands", commands.len()),
            Err(e) => error!("Failed to register slash commands: {}", e),
        }
    }

    pub async fn handle_command(&self, ctx: &Context, interaction: &CommandInteraction) {
        let options: Vec<(&str, &str)> = interaction
            .data
            .options
            .iter()
            .filter_map(|option| option.value.as_str().map(|value| (option.name.as_str(), value)))
            .collect();

        let Some(command) = BotCommand::from_parts(&interaction.data.name, &options) else {
            warn!("Unknown command '{}' from {}", interaction.data.name, interaction.user.name);
            if let Err(e) = interaction.defer_ephemeral(ctx).await {
                error!("Failed to defer /{}: {}", interaction.data.name, e);
                return;
            }
            self.reply(ctx, interaction, format::unknown_command(&interaction.data.name)).await;
            return;
        };

        info!("/{} from {} ({})", command.name(), interaction.user.name, interaction.user.id);
        let received_at = Utc::now();

        let deferred = if command.is_ephemeral() {
            interaction.defer_ephemeral(ctx).await
        } else {
            interaction.defer(ctx).await
        };
        if let Err(e) = deferred {
            error!("Failed to defer /{}: {}", command.name(), e);
            return;
        }

        let reply = self.execute(ctx, interaction, command, received_at).await;
        self.reply(ctx, interaction, reply).await;
    }

    /// Fill in a deferred response.
    async fn reply(&self, ctx: &Context, interaction: &CommandInteraction, content: String) {
        let response = EditInteractionResponse::new().content(content);
        if let Err(e) = interaction.edit_response(ctx, response).await {
            error!("Failed to reply to /{}: {}", interaction.data.name, e);
        }
    }

    async fn execute(
        &self,
        ctx: &Context,
        interaction: &CommandInteraction,
        command: BotCommand,
        received_at: DateTime<Utc>,
    ) -> String {
        let account_id = interaction.user.id.to_string();

        match command {
            BotCommand::Ping => {
                let created_at = *interaction.id.created_at();
                format::ping((received_at - created_at).num_milliseconds())
            }
            BotCommand::Site => format::site(self.site_url.as_deref()),
            BotCommand::SyncGuild => {
                let Some(guild_id) = interaction.guild_id else {
                    return "This command can only be used in a server.".to_string();
                };
                self.sync_guild(ctx, guild_id).await
            }
            BotCommand::Link { character } => match self.roster.link(&account_id, &character).await {
                Ok(outcome) => format::link(&character, &outcome),
                Err(e) => {
                    error!("Link failed for {}: {}", account_id, e);
                    format::roster_error(&e)
                }
            },
            BotCommand::AddAlt { character } => match self.roster.add_alt(&account_id, &character).await {
                Ok(added) => format::add_alt(&added),
                Err(e) => {
                    error!("Add-alt failed for {}: {}", account_id, e);
                    format::roster_error(&e)
                }
            },
            BotCommand::Rename { old, new } => match self.roster.rename(&account_id, &old, &new).await {
                Ok(new_name) => format::rename(&old, &new_name),
                Err(e) => {
                    error!("Rename failed for {}: {}", account_id, e);
                    format::roster_error(&e)
                }
            },
            BotCommand::Unlink => match self.roster.unlink(&account_id).await {
                Ok(owned) => format::unlink(&owned),
                Err(e) => {
                    error!("Unlink failed for {}: {}", account_id, e);
                    format::roster_error(&e)
                }
            },
            BotCommand::WhoAmI => match self.roster.whoami(&account_id).await {
                Ok(identity) => format::whoami(&identity),
                Err(e) => {
                    error!("Whoami failed for {}: {}", account_id, e);
                    format::roster_error(&e)
                }
            },
            BotCommand::Score => match self.roster.owned_characters(&account_id).await {
                Ok(characters) => format::score(&characters),
                Err(e) => {
                    error!("Score lookup failed for {}: {}", account_id, e);
                    format::roster_error(&e)
                }
            },
            BotCommand::Power => match self.roster.owned_characters(&account_id).await {
                Ok(characters) => format::power(&characters),
                Err(e) => {
                    error!("Power lookup failed for {}: {}", account_id, e);
                    format::roster_error(&e)
                }
            },
            BotCommand::Lookup { character } => {
                let Some(stats) = self.stats.as_ref() else {
                    return "Character lookup is not configured.".to_string();
                };
                match stats.fetch_character(&character).await {
                    Ok(data) => format::lookup(&character, &data),
                    Err(e) => {
                        error!("Stats lookup failed for '{}': {}", character, e);
                        format::stats_error(&e)
                    }
                }
            }
        }
    }

    async fn sync_guild(&self, ctx: &Context, guild_id: GuildId) -> String {
        let members = match fetch_members(ctx, guild_id).await {
            Ok(members) => members,
            Err(e) => {
                error!("Failed to fetch members of guild {}: {}", guild_id, e);
                return "Could not fetch the guild member list.".to_string();
            }
        };

        match self.roster.sync_guild(&members).await {
            Ok(summary) => format::sync_summary(&summary),
            Err(e) => {
                error!("Guild sync failed: {}", e);
                format!("Sync failed: {}", format::roster_error(&e))
            }
        }
    }

    pub async fn handle_member_added(&self, member: &Member) {
        if member.user.bot || !self.is_tracked_guild(member.guild_id) {
            return;
        }
        let display_name = member.nick.clone().unwrap_or_else(|| member.user.name.clone());
        self.reconcile_member(&member.user, &display_name, true).await;
    }

    pub async fn handle_member_removed(&self, guild_id: GuildId, user: &User, member: Option<&Member>) {
        if user.bot || !self.is_tracked_guild(guild_id) {
            return;
        }
        let display_name = member
            .and_then(|m| m.nick.clone())
            .unwrap_or_else(|| user.name.clone());
        self.reconcile_member(user, &display_name, false).await;
    }

    async fn reconcile_member(&self, user: &User, display_name: &str, joining: bool) {
        let account_id = user.id.to_string();
        match self.roster.reconcile_member(&account_id, display_name, joining).await {
            Ok(changed) if changed.is_empty() => {
                debug!("No roster changes for {} ({})", user.name, display_name);
            }
            Ok(changed) => {
                let marker = if joining { "joined, marked present" } else { "left, marked absent" };
                info!("{} {}: {}", user.name, marker, changed.join(", "));
            }
            Err(e) => {
                error!("Member sync failed for {}: {}", user.name, e);
            }
        }
    }

    fn is_tracked_guild(&self, guild_id: GuildId) -> bool {
        self.guild_id.map_or(true, |tracked| tracked == guild_id)
    }
}

/// All guild members, paging through the member list.
async fn fetch_members(ctx: &Context, guild_id: GuildId) -> serenity::Result<Vec<GuildMember>> {
    let mut members = Vec::new();
    let mut stream = Box::pin(guild_id.members_iter(&ctx.http));
    while let Some(member) = stream.next().await {
        members.push(to_guild_member(&member?));
    }
    debug!("Fetched {} members of guild {}", members.len(), guild_id);
    Ok(members)
}

fn to_guild_member(member: &Member) -> GuildMember {
    GuildMember {
        account_id: member.user.id.to_string(),
        display_name: member.nick.clone().unwrap_or_else(|| member.user.name.clone()),
        bot: member.user.bot,
    }
}
