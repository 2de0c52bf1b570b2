//! Gifting account management commands (admin only).

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, Error},
        core::account,
        errors::Result,
    };
    use std::fmt::Write as _;

    /// Manage the shop's gifting accounts.
    #[poise::command(
        slash_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("account_add", "account_list")
    )]
    pub async fn account(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Account management subcommands: `add`, `list`.")
            .await?;
        Ok(())
    }

    /// Registers a new gifting account.
    #[poise::command(slash_command, rename = "add")]
    pub async fn account_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "In-game nickname of the account"] nickname: String,
        #[description = "Starting RP balance"] rp_balance: i64,
        #[description = "Friend-list capacity"] max_friends: Option<i32>,
        #[description = "Server region (default BR)"] region: Option<String>,
    ) -> Result<()> {
        let created = account::create_account(
            &ctx.data().database,
            nickname,
            rp_balance,
            max_friends.unwrap_or(250),
            region.unwrap_or_else(|| "BR".to_string()),
        )
        .await?;

        ctx.say(format!(
            "Registered account `{}` - **{}** ({}, {} RP, {} friend slots).",
            created.id, created.nickname, created.region, created.rp_balance, created.max_friends
        ))
        .await?;
        Ok(())
    }

    /// Lists all gifting accounts with balances and slot usage.
    #[poise::command(slash_command, rename = "list")]
    pub async fn account_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let accounts = account::get_all_accounts(&ctx.data().database).await?;

        if accounts.is_empty() {
            ctx.say("No gifting accounts registered. Add one with `/account add`.")
                .await?;
            return Ok(());
        }

        let mut text = String::from("**Gifting accounts**\n");
        for acc in accounts {
            writeln!(
                &mut text,
                "• `{}` **{}** ({}) - {} RP, {}/{} friends",
                acc.id, acc.nickname, acc.region, acc.rp_balance, acc.friends_count, acc.max_friends
            )?;
        }
        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
