//! General Discord commands - ping, help, and coordinator introspection.
//! This module contains simple commands that don't require database
//! operations and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, Error},
        errors::Result,
    };
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    ///
    /// This is a simple health check command that doesn't require any database operations.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**ShopBuddy Help**\n\
        Here is a summary of all available commands.\n\n\
        **Shopping**\n\
        • `/shop` - Opens (or refreshes) your cart in this ticket channel.\n\
        • `/search <category> <query>` - Searches the catalog within a category.\n\
        • `/link <account_id> <nickname> <tag>` - Requests a friendship with a gifting account.\n\n\
        **Management (admins)**\n\
        • `/account <subcommand>` - Manage gifting accounts (add, list).\n\
        • `/catalog <subcommand>` - Manage catalog items (add, remove, list).\n\
        • `/price <subcommand>` - Show or set the EUR-per-RP rate.\n\
        • `/revenue [days]` - Revenue summary over completed orders.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/shopstats` - Shows message tracking statistics.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows the message coordinator's tracking statistics.
    ///
    /// Read-only operational visibility: how many channels have a tracked
    /// UI message and which screens they currently show.
    #[poise::command(slash_command)]
    pub async fn shopstats(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let stats = ctx.data().coordinator.stats().await;

        let mut text = format!("**Tracked channels:** {}\n", stats.tracked_channels);

        if stats.contexts.is_empty() {
            text.push_str("No client messages are currently tracked.");
        } else {
            text.push_str("**Active contexts:**\n");
            let mut contexts: Vec<_> = stats.contexts.iter().collect();
            contexts.sort();
            for (context, count) in contexts {
                writeln!(&mut text, "• `{context}`: {count}")?;
            }
            if let (Some(oldest), Some(newest)) = (stats.oldest_touch, stats.newest_touch) {
                write!(
                    &mut text,
                    "Oldest touch: <t:{}:R> · Newest touch: <t:{}:R>",
                    oldest.timestamp(),
                    newest.timestamp()
                )?;
            }
        }

        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
