//! Quartermaster - Discord guild roster bot backed by a Google Sheet
//!
//! Keeps the roster's presence column in sync with guild membership and
//! lets members link their main and alt characters to their Discord account.

mod common;
mod config;
mod discord;
mod roster;
mod sheets;
mod stats;

use std::sync::Arc;

use anyhow::Result;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use config::env::{check_empty_env_vars, get_config_path};
use config::load_and_validate;
use discord::{DiscordBotBuilder, RosterHandler};
use roster::RosterService;
use sheets::{SheetRange, SheetsClient, TableStore};
use stats::StatsClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Quartermaster v{} starting...", env!("CARGO_PKG_VERSION"));

    for name in check_empty_env_vars() {
        warn!("Environment variable {} is set but empty; ignoring it", name);
    }

    // Load configuration
    let config_path = get_config_path();
    info!("Loading configuration from {}...", config_path);

    let config = load_and_validate(&config_path).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        error!("Please ensure {} exists and is properly formatted.", config_path);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("  Spreadsheet: {}", config.sheets.spreadsheet_id);
    info!(
        "  Roster sheet: {}",
        config.sheets.roster_sheet.as_deref().unwrap_or("(first sheet)")
    );
    info!("  Identity sheet: {}", config.sheets.identity_sheet);
    match config.discord.guild_id {
        Some(guild_id) => info!("  Commands registered on guild {}", guild_id),
        None => info!("  Commands registered globally"),
    }

    // ============================================================
    // Build the sheet store and services
    // ============================================================
    let sheets_client = SheetsClient::from_config(&config.sheets)?;
    info!("  Service account: {}", sheets_client.service_account());
    let store: Arc<dyn TableStore> = Arc::new(sheets_client);

    let roster = RosterService::new(
        store,
        SheetRange::from_option(config.sheets.roster_sheet.as_deref()),
        SheetRange::named(config.sheets.identity_sheet.clone()),
    );

    let stats = match config.stats.as_ref() {
        Some(stats_config) => {
            info!("  Stats lookup: {}", stats_config.base_url);
            Some(StatsClient::new(stats_config)?)
        }
        None => {
            info!("  Stats lookup disabled");
            None
        }
    };

    let handler = RosterHandler::new(
        roster,
        stats,
        config.discord.site_url.clone(),
        config.discord.guild_id,
    );

    // ============================================================
    // Start Discord bot
    // ============================================================
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let discord_bot = DiscordBotBuilder::new(config.discord.token.clone(), handler, shutdown_rx)
        .build()
        .await?;

    info!("Starting Discord bot...");
    let mut discord_task = tokio::spawn(async move {
        discord_bot.run().await;
    });

    let shutdown = tokio::select! {
        biased;
        _ = shutdown_signal() => {
            info!("Shutdown signal received - disconnecting from Discord...");
            true
        }
        _ = &mut discord_task => false,
    };

    // Handle graceful shutdown
    if shutdown {
        if let Err(e) = shutdown_tx.send(true) {
            debug!("Shutdown channel closed (Discord task already exited): {}", e);
        }
        let timeout = tokio::time::Duration::from_secs(5);
        match tokio::time::timeout(timeout, discord_task).await {
            Ok(Ok(())) => info!("Discord bot stopped gracefully"),
            Ok(Err(e)) => warn!("Discord task panicked: {}", e),
            Err(_) => warn!("Discord shutdown timed out"),
        }
    }

    info!("Exiting...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
