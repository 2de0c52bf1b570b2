//! Price rate management commands (admin only).
//!
//! The EUR-per-RP rate drives every cart and order total. Changes persist
//! in the settings table and apply to carts from the next recalculation on;
//! existing order snapshots keep the rate they were created with.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, Error},
        core::pricing,
        errors::Result,
    };

    /// Show or change the EUR-per-RP price rate.
    #[poise::command(
        slash_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("price_show", "price_set")
    )]
    pub async fn price(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Price subcommands: `show`, `set`.").await?;
        Ok(())
    }

    /// Shows the effective EUR-per-RP rate.
    #[poise::command(slash_command, rename = "show")]
    pub async fn price_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let rate = pricing::get_rate(&data.database, data.settings.eur_per_rp).await?;

        ctx.say(format!(
            "Current rate: **€{rate}** per RP (1350 RP ≈ €{:.2}).",
            pricing::price_for_rp(1350, rate)
        ))
        .await?;
        Ok(())
    }

    /// Sets a new EUR-per-RP rate.
    #[poise::command(slash_command, rename = "set")]
    pub async fn price_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "New EUR price of one RP (e.g. 0.01)"] rate: f64,
    ) -> Result<()> {
        match pricing::set_rate(&ctx.data().database, rate).await {
            Ok(rate) => {
                ctx.say(format!("Rate updated to **€{rate}** per RP.")).await?;
            }
            Err(Error::InvalidAmount { amount }) => {
                ctx.say(format!("`{amount}` is not a valid rate; it must be positive."))
                    .await?;
            }
            Err(error) => return Err(error),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
