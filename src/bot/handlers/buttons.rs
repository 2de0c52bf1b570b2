//! Button and select-menu interaction routing for the ticket-channel UI.
//!
//! Custom ids follow `action_arg1[_arg2...]` with the catalog category
//! always last, since category names contain underscores. Every screen
//! update goes through the message coordinator so a channel keeps a single
//! current UI message.

use crate::bot::{BotData, views};
use crate::core::{account, cart, catalog, friendship, order, pricing, user};
use crate::entities::cart::status as cart_status;
use crate::errors::{Error, Result};
use crate::messaging::{DiscordChannel, RenderedMessage};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::debug;

/// Routes one component interaction by its custom id.
pub async fn handle_component(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
) -> Result<()> {
    let custom_id = interaction.data.custom_id.clone();
    let Some((action, rest)) = custom_id.split_once('_') else {
        return Ok(());
    };
    debug!(action, rest, "Routing component interaction");

    match action {
        "cart" => {
            let cart_id = parse_id(rest)?;
            show_cart(ctx, data, interaction.channel_id, cart_id).await?;
            acknowledge(ctx, interaction).await
        }
        "browse" => {
            let cart_id = parse_id(rest)?;
            show_categories(ctx, data, interaction.channel_id, cart_id).await?;
            acknowledge(ctx, interaction).await
        }
        "category" => {
            let cart_id = parse_id(rest)?;
            let Some(category) = selected_value(interaction) else {
                return Ok(());
            };
            show_items(ctx, data, interaction.channel_id, cart_id, &category, 1).await?;
            acknowledge(ctx, interaction).await
        }
        "items" => {
            // items_{cartId}_{page}_{category}
            let (cart_id, rest) = rest.split_once('_').ok_or_else(bad_custom_id)?;
            let (page, category) = rest.split_once('_').ok_or_else(bad_custom_id)?;
            let cart_id = parse_id(cart_id)?;
            let page = parse_id(page)?.try_into()?;
            show_items(ctx, data, interaction.channel_id, cart_id, category, page).await?;
            acknowledge(ctx, interaction).await
        }
        "additem" => add_item(ctx, data, interaction, parse_id(rest)?).await,
        "remove" => remove_item(ctx, data, interaction, parse_id(rest)?).await,
        "checkout" => checkout(ctx, data, interaction, parse_id(rest)?).await,
        "deliver" => deliver(ctx, data, interaction, parse_id(rest)?).await,
        "cancel" => cancel(ctx, data, interaction, parse_id(rest)?).await,
        "orderapprove" => review_order(ctx, data, interaction, parse_id(rest)?, true).await,
        "orderreject" => review_order(ctx, data, interaction, parse_id(rest)?, false).await,
        "friendapprove" => review_friendship(ctx, data, interaction, parse_id(rest)?, true).await,
        "friendreject" => review_friendship(ctx, data, interaction, parse_id(rest)?, false).await,
        _ => Ok(()),
    }
}

/// Renders the cart screen for a channel through the coordinator.
pub async fn show_cart(
    ctx: &serenity::Context,
    data: &BotData,
    channel_id: serenity::ChannelId,
    cart_id: i64,
) -> Result<()> {
    let cart_model = cart::get_cart_by_id(&data.database, cart_id)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;
    let items = cart::get_items(&data.database, cart_id).await?;

    let channel = client_channel(ctx, channel_id);
    data.coordinator
        .upsert(
            &channel,
            &views::cart_view(&cart_model, &items),
            &format!("cart_{cart_id}"),
            false,
        )
        .await?;
    Ok(())
}

/// Renders the category selection screen.
pub async fn show_categories(
    ctx: &serenity::Context,
    data: &BotData,
    channel_id: serenity::ChannelId,
    cart_id: i64,
) -> Result<()> {
    let categories = catalog::get_categories(&data.database).await?;

    let channel = client_channel(ctx, channel_id);
    data.coordinator
        .upsert(
            &channel,
            &views::category_view(cart_id, &categories),
            &format!("categories_{cart_id}"),
            false,
        )
        .await?;
    Ok(())
}

/// Renders one page of a category listing.
pub async fn show_items(
    ctx: &serenity::Context,
    data: &BotData,
    channel_id: serenity::ChannelId,
    cart_id: i64,
    category: &str,
    page: u64,
) -> Result<()> {
    let page = catalog::get_items_page(&data.database, category, page).await?;

    let channel = client_channel(ctx, channel_id);
    data.coordinator
        .upsert(
            &channel,
            &views::items_view(cart_id, category, &page, None),
            &format!("items_{cart_id}_{category}"),
            false,
        )
        .await?;
    Ok(())
}

/// Renders a page of in-category search results.
pub async fn show_search(
    ctx: &serenity::Context,
    data: &BotData,
    channel_id: serenity::ChannelId,
    cart_id: i64,
    category: &str,
    query: &str,
) -> Result<()> {
    let page = catalog::search_items(&data.database, category, query, 1).await?;

    let channel = client_channel(ctx, channel_id);
    data.coordinator
        .upsert(
            &channel,
            &views::items_view(cart_id, category, &page, Some(query)),
            &format!("search_{cart_id}_{query}"),
            false,
        )
        .await?;
    Ok(())
}

/// Renders the checkout screen. Always a new message so the user keeps
/// the cart screen they were reading in their scrollback.
///
/// Returns false without rendering when the user is unknown to the shop.
pub async fn show_checkout(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    cart_id: i64,
) -> Result<bool> {
    let cart_model = cart::get_cart_by_id(&data.database, cart_id)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;
    let items = cart::get_items(&data.database, cart_id).await?;

    let Some(shopper) =
        user::get_user_by_discord_id(&data.database, &interaction.user.id.to_string()).await?
    else {
        return Ok(false);
    };

    let statuses = friendship::eligibility_for_user(
        &data.database,
        shopper.id,
        data.settings.min_friendship_days,
    )
    .await?;

    let mut targets = Vec::with_capacity(statuses.len());
    for status in statuses {
        let Some(acc) =
            account::get_account_by_id(&data.database, status.friendship.account_id).await?
        else {
            continue;
        };
        targets.push((status, acc));
    }

    let channel = client_channel(ctx, interaction.channel_id);
    data.coordinator
        .force_new(
            &channel,
            &views::checkout_view(&cart_model, &items, &targets),
            &format!("checkout_{cart_id}"),
        )
        .await?;
    Ok(true)
}

async fn add_item(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    cart_id: i64,
) -> Result<()> {
    let Some(value) = selected_value(interaction) else {
        return Ok(());
    };
    let item_id = parse_id(&value)?;

    let Some(item) = catalog::get_item_by_id(&data.database, item_id).await? else {
        return respond_ephemeral(
            ctx,
            interaction,
            views::error_embed("Unavailable", "That item is no longer in the catalog."),
        )
        .await;
    };

    let rate = pricing::get_rate(&data.database, data.settings.eur_per_rp).await?;
    match cart::add_item(&data.database, cart_id, &item, rate).await {
        Ok(_) => {
            show_cart(ctx, data, interaction.channel_id, cart_id).await?;
            acknowledge(ctx, interaction).await
        }
        Err(Error::Config { message }) => {
            respond_ephemeral(ctx, interaction, views::warning_embed("Not added", &message)).await
        }
        Err(error) => Err(error),
    }
}

async fn remove_item(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    cart_id: i64,
) -> Result<()> {
    let Some(value) = selected_value(interaction) else {
        return Ok(());
    };
    let cart_item_id = parse_id(&value)?;

    let rate = pricing::get_rate(&data.database, data.settings.eur_per_rp).await?;
    cart::remove_item(&data.database, cart_id, cart_item_id, rate).await?;

    show_cart(ctx, data, interaction.channel_id, cart_id).await?;
    acknowledge(ctx, interaction).await
}

async fn checkout(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    cart_id: i64,
) -> Result<()> {
    let cart_model = cart::get_cart_by_id(&data.database, cart_id)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;

    if cart_model.total_rp == 0 {
        return respond_ephemeral(
            ctx,
            interaction,
            views::warning_embed("Empty cart", "Add some items before checking out."),
        )
        .await;
    }
    if cart_model.status != cart_status::ACTIVE {
        return respond_ephemeral(
            ctx,
            interaction,
            views::warning_embed(
                "Cart closed",
                &format!("This cart is {} and cannot be checked out.", cart_model.status),
            ),
        )
        .await;
    }

    if show_checkout(ctx, data, interaction, cart_id).await? {
        acknowledge(ctx, interaction).await
    } else {
        respond_ephemeral(
            ctx,
            interaction,
            views::error_embed("No account", "Use `/link` to add a delivery account first."),
        )
        .await
    }
}

async fn deliver(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    cart_id: i64,
) -> Result<()> {
    let Some(value) = selected_value(interaction) else {
        return Ok(());
    };
    let friendship_id = parse_id(&value)?;

    let cart_model = cart::get_cart_by_id(&data.database, cart_id)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;
    let friendship_model = friendship::get_friendship_by_id(&data.database, friendship_id)
        .await?
        .ok_or(Error::FriendshipNotFound { id: friendship_id })?;

    let placed = match order::create_order(
        &data.database,
        &cart_model,
        &friendship_model,
        data.settings.min_friendship_days,
    )
    .await
    {
        Ok(placed) => placed,
        Err(Error::FriendshipNotEligible { days_remaining }) => {
            return respond_ephemeral(
                ctx,
                interaction,
                views::warning_embed(
                    "Not eligible yet",
                    &format!("This account can receive gifts in {days_remaining} days."),
                ),
            )
            .await;
        }
        Err(error) => return Err(error),
    };

    let nickname = account::get_account_by_id(&data.database, friendship_model.account_id)
        .await?
        .map_or_else(|| "unknown".to_string(), |a| a.nickname);

    let channel = client_channel(ctx, interaction.channel_id);
    data.coordinator
        .force_new(
            &channel,
            &views::order_view(&placed, &nickname),
            &format!("order_{}", placed.id),
        )
        .await?;
    acknowledge(ctx, interaction).await
}

async fn cancel(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    cart_id: i64,
) -> Result<()> {
    match cart::cancel_cart(&data.database, cart_id).await {
        Ok(_) => {}
        Err(Error::CartNotActive { status, .. }) => {
            return respond_ephemeral(
                ctx,
                interaction,
                views::warning_embed(
                    "Nothing to cancel",
                    &format!("This cart is already {status}."),
                ),
            )
            .await;
        }
        Err(error) => return Err(error),
    }

    let channel = client_channel(ctx, interaction.channel_id);
    data.coordinator
        .upsert(
            &channel,
            &RenderedMessage::embed(views::success_embed(
                "Cart cancelled",
                "Run `/shop` whenever you want to start a new one.",
            )),
            &format!("cancelled_{cart_id}"),
            false,
        )
        .await?;
    acknowledge(ctx, interaction).await
}

async fn review_order(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    order_id: i64,
    approve: bool,
) -> Result<()> {
    if !is_admin(interaction) {
        return respond_ephemeral(
            ctx,
            interaction,
            views::error_embed("Not allowed", "Only admins can review orders."),
        )
        .await;
    }

    let reviewed = if approve {
        match order::approve_order(&data.database, order_id).await {
            Ok(reviewed) => reviewed,
            Err(Error::InvalidAmount { .. }) => {
                return respond_ephemeral(
                    ctx,
                    interaction,
                    views::error_embed(
                        "Insufficient RP",
                        "The gifting account cannot cover this order.",
                    ),
                )
                .await;
            }
            Err(error) => return Err(error),
        }
    } else {
        order::reject_order(&data.database, order_id).await?
    };

    let friendship_model = friendship::get_friendship_by_id(&data.database, reviewed.friendship_id)
        .await?
        .ok_or(Error::FriendshipNotFound {
            id: reviewed.friendship_id,
        })?;
    let nickname = account::get_account_by_id(&data.database, friendship_model.account_id)
        .await?
        .map_or_else(|| "unknown".to_string(), |a| a.nickname);

    let channel = client_channel(ctx, interaction.channel_id);
    data.coordinator
        .upsert(
            &channel,
            &views::order_view(&reviewed, &nickname),
            &format!("order_{order_id}"),
            false,
        )
        .await?;
    acknowledge(ctx, interaction).await
}

async fn review_friendship(
    ctx: &serenity::Context,
    data: &BotData,
    interaction: &serenity::ComponentInteraction,
    friendship_id: i64,
    approve: bool,
) -> Result<()> {
    if !is_admin(interaction) {
        return respond_ephemeral(
            ctx,
            interaction,
            views::error_embed("Not allowed", "Only admins can review friendship requests."),
        )
        .await;
    }

    let notice = if approve {
        let approved = friendship::approve_friendship(&data.database, friendship_id).await?;
        account::increment_friends_count(&data.database, approved.account_id).await?;
        views::success_embed(
            "Friendship approved",
            &format!(
                "Gifts unlock after {} days of friendship.",
                data.settings.min_friendship_days
            ),
        )
    } else {
        friendship::reject_friendship(&data.database, friendship_id).await?;
        views::error_embed("Friendship rejected", "The request was declined by an admin.")
    };

    let channel = client_channel(ctx, interaction.channel_id);
    data.coordinator
        .upsert(
            &channel,
            &RenderedMessage::embed(notice),
            &format!("friend_{friendship_id}"),
            false,
        )
        .await?;
    acknowledge(ctx, interaction).await
}

/// Wraps the interaction's channel for the coordinator.
fn client_channel(ctx: &serenity::Context, channel_id: serenity::ChannelId) -> DiscordChannel {
    let bot_user_id = ctx.cache.current_user().id;
    DiscordChannel::new(Arc::clone(&ctx.http), channel_id, bot_user_id)
}

fn is_admin(interaction: &serenity::ComponentInteraction) -> bool {
    interaction
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .is_some_and(serenity::Permissions::manage_guild)
}

fn selected_value(interaction: &serenity::ComponentInteraction) -> Option<String> {
    match &interaction.data.kind {
        serenity::ComponentInteractionDataKind::StringSelect { values } => values.first().cloned(),
        _ => None,
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| bad_custom_id())
}

fn bad_custom_id() -> Error {
    Error::Config {
        message: "malformed component custom id".to_string(),
    }
}

async fn acknowledge(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
) -> Result<()> {
    interaction
        .create_response(&ctx.http, serenity::CreateInteractionResponse::Acknowledge)
        .await?;
    Ok(())
}

async fn respond_ephemeral(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    embed: serenity::CreateEmbed,
) -> Result<()> {
    interaction
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .embed(embed)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}
