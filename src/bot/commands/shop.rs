//! Client-facing shop commands - the entry points of a shopping session.
//!
//! `/shop` renders the cart screen in the current ticket channel, `/search`
//! drives the in-category search screen, and `/link` starts the friendship
//! flow toward a gifting account. All screen updates go through the message
//! coordinator so each channel keeps a single current UI message.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, Error, handlers::buttons, views},
        core::{account, cart, friendship, user},
        errors::Result,
        messaging::DiscordChannel,
    };
    use std::fmt::Write as _;
    use std::sync::Arc;

    fn client_channel(ctx: &poise::Context<'_, BotData, Error>) -> DiscordChannel {
        let serenity_ctx = ctx.serenity_context();
        let bot_user_id = serenity_ctx.cache.current_user().id;
        DiscordChannel::new(
            Arc::clone(&serenity_ctx.http),
            ctx.channel_id(),
            bot_user_id,
        )
    }

    /// Opens (or refreshes) your cart in this ticket channel.
    #[poise::command(slash_command, guild_only)]
    pub async fn shop(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let shopper = user::find_or_create_user(
            &data.database,
            &ctx.author().id.to_string(),
            &ctx.author().name,
        )
        .await?;

        let cart_model = cart::get_or_create_cart(
            &data.database,
            shopper.id,
            &ctx.channel_id().to_string(),
        )
        .await?;

        buttons::show_cart(
            ctx.serenity_context(),
            data,
            ctx.channel_id(),
            cart_model.id,
        )
        .await?;

        ctx.send(
            poise::CreateReply::default()
                .content("Your cart is ready below. 🛒")
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Searches the catalog within a category.
    #[poise::command(slash_command, guild_only)]
    pub async fn search(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Catalog category to search in"] category: String,
        #[description = "Part of the item name"] query: String,
    ) -> Result<()> {
        let data = ctx.data();
        let Some(cart_model) =
            cart::get_cart_by_channel(&data.database, &ctx.channel_id().to_string()).await?
        else {
            ctx.send(
                poise::CreateReply::default()
                    .embed(views::warning_embed(
                        "No cart",
                        "Run `/shop` in this channel first.",
                    ))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        };

        buttons::show_search(
            ctx.serenity_context(),
            data,
            ctx.channel_id(),
            cart_model.id,
            &category,
            &query,
        )
        .await?;

        ctx.send(
            poise::CreateReply::default()
                .content("Search results are below. 🔎")
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Requests a friendship with a gifting account so it can deliver to you.
    #[poise::command(slash_command, guild_only)]
    pub async fn link(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Id of the gifting account (see the list on failure)"] account_id: i64,
        #[description = "Your in-game nickname"] nickname: String,
        #[description = "Your in-game tagline (after the #)"] tag: String,
    ) -> Result<()> {
        let data = ctx.data();
        let shopper = user::find_or_create_user(
            &data.database,
            &ctx.author().id.to_string(),
            &ctx.author().name,
        )
        .await?;

        let Some(target) = account::get_account_by_id(&data.database, account_id).await? else {
            let available = account::get_available_accounts(&data.database, None).await?;
            let mut text = String::from("Unknown account id. Accounts with free slots:\n");
            for acc in available.iter().take(10) {
                writeln!(
                    &mut text,
                    "• `{}` - **{}** ({}, {}/{} friends)",
                    acc.id, acc.nickname, acc.region, acc.friends_count, acc.max_friends
                )?;
            }
            ctx.send(
                poise::CreateReply::default()
                    .embed(views::error_embed("Account not found", &text))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        };

        match friendship::request_friendship(
            &data.database,
            shopper.id,
            target.id,
            &target.nickname,
            nickname.clone(),
            tag.clone(),
        )
        .await
        {
            Ok(request) => {
                // Friendship notices are time-sensitive; never overwrite a
                // screen the user might still be reading
                let channel = client_channel(&ctx);
                data.coordinator
                    .force_new(
                        &channel,
                        &views::friendship_request_view(
                            &ctx.author().name,
                            &target.nickname,
                            &nickname,
                            &tag,
                            request.id,
                        ),
                        &format!("friend_{}", request.id),
                    )
                    .await?;

                ctx.send(
                    poise::CreateReply::default()
                        .embed(views::success_embed(
                            "Request sent",
                            &format!(
                                "Add **{}** in game as **{nickname}#{tag}** and wait for approval.",
                                target.nickname
                            ),
                        ))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(Error::DuplicateFriendship { account }) => {
                ctx.send(
                    poise::CreateReply::default()
                        .embed(views::warning_embed(
                            "Already linked",
                            &format!("You already have a friendship or pending request with **{account}**."),
                        ))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(error) => return Err(error),
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
