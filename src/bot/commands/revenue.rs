//! Revenue reporting command (admin only).

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, Error},
        core::order,
        errors::Result,
    };

    /// Summarizes completed orders, optionally over a trailing window.
    #[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn revenue(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only count orders completed in the last N days"] days: Option<i64>,
    ) -> Result<()> {
        let since = days.map(|d| chrono::Utc::now() - chrono::Duration::days(d));
        let summary = order::revenue_since(&ctx.data().database, since).await?;

        let window = days.map_or_else(|| "all time".to_string(), |d| format!("last {d} days"));
        ctx.say(format!(
            "**Revenue ({window})**\n\
             Orders completed: {}\n\
             RP delivered: {}\n\
             Collected: €{:.2}",
            summary.order_count, summary.total_rp, summary.total_eur
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
