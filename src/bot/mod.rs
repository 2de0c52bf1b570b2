//! Bot layer - Discord-specific interface, command handlers, and client UI.
//!
//! This module provides the Discord interface for the `ShopBuddy` shop,
//! including admin slash commands, the component-interaction router driving
//! the ticket-channel UI, and bot context management.

/// Admin and general slash commands
pub mod commands;
/// Component interaction routing (buttons, select menus)
pub mod handlers;
/// Embed and component builders for every client screen
pub mod views;

use crate::config::settings::ShopSettings;
use crate::errors;
use crate::messaging::MessageCoordinator;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info};

/// Shared data available to all bot commands and handlers.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Shop-wide settings loaded at startup
    pub settings: ShopSettings,
    /// Client message lifecycle coordinator (one per process)
    pub coordinator: Arc<MessageCoordinator>,
}

impl BotData {
    /// Creates the shared bot context.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        settings: ShopSettings,
        coordinator: Arc<MessageCoordinator>,
    ) -> Self {
        Self {
            database,
            settings,
            coordinator,
        }
    }
}

/// Type alias for the error type Poise will use
pub(crate) type Error = errors::Error;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Assembles the Poise framework and runs the bot until shutdown.
///
/// Spawns the message cache sweeper alongside the gateway client; the
/// sweeper lives for the rest of the process.
pub async fn run_bot(
    token: String,
    settings: ShopSettings,
    database: DatabaseConnection,
) -> Result<(), serenity::Error> {
    let coordinator = Arc::new(MessageCoordinator::new(chrono::Duration::minutes(
        settings.message_max_age_minutes,
    )));
    // The sweeper task runs for the rest of the process; dropping the
    // handle detaches it
    let _sweeper = coordinator.spawn_sweeper(std::time::Duration::from_secs(
        settings.cache_sweep_minutes * 60,
    ));

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::shopstats(),
                commands::shop(),
                commands::search(),
                commands::link(),
                commands::account(),
                commands::catalog(),
                commands::price(),
                commands::revenue(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, settings, coordinator))
            })
        })
        .build();

    // MESSAGE_CONTENT is needed to see payment-proof attachments
    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))
}
