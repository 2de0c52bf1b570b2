//! Embed and component builders for every client screen.
//!
//! Each function assembles a [`RenderedMessage`] from core data; nothing
//! here touches the database or Discord. Custom ids follow the
//! `action_arg1_arg2` convention the interaction router parses, with the
//! category always last because category names contain underscores.

use crate::core::catalog::CatalogPage;
use crate::core::friendship::EligibilityStatus;
use crate::entities::{account, cart, cart_item, order};
use crate::messaging::RenderedMessage;
use poise::serenity_prelude as serenity;
use std::fmt::Write;

/// Accent color for browsing screens
const BRAND: serenity::Colour = serenity::Colour::new(0x0058_65f2);
/// Red for errors and rejections
const RED: serenity::Colour = serenity::Colour::new(0x00ed_4245);
/// Green for confirmations
const GREEN: serenity::Colour = serenity::Colour::new(0x0057_f287);
/// Amber for warnings and pending states
const AMBER: serenity::Colour = serenity::Colour::new(0x00fa_a61a);

/// The cart screen: item list, totals, and the main action row.
#[must_use]
pub fn cart_view(cart: &cart::Model, items: &[cart_item::Model]) -> RenderedMessage {
    let mut description = String::new();
    if items.is_empty() {
        description.push_str("Your cart is empty. Browse the catalog to add items!");
    } else {
        for (index, item) in items.iter().enumerate() {
            let _ = writeln!(
                description,
                "{}. **{}** - {} RP",
                index + 1,
                item.item_name,
                item.item_price
            );
        }
    }

    let embed = serenity::CreateEmbed::new()
        .title("🛒 Your Cart")
        .description(description)
        .field("Total RP", cart.total_rp.to_string(), true)
        .field("Total", format!("€{:.2}", cart.total_price), true)
        .colour(BRAND)
        .footer(serenity::CreateEmbedFooter::new(format!("Cart #{}", cart.id)));

    let buttons = vec![
        serenity::CreateButton::new(format!("browse_{}", cart.id))
            .label("Browse Items")
            .style(serenity::ButtonStyle::Primary),
        serenity::CreateButton::new(format!("checkout_{}", cart.id))
            .label("Checkout")
            .style(serenity::ButtonStyle::Success)
            .disabled(items.is_empty()),
        serenity::CreateButton::new(format!("cancel_{}", cart.id))
            .label("Cancel")
            .style(serenity::ButtonStyle::Danger),
    ];

    let mut components = vec![serenity::CreateActionRow::Buttons(buttons)];

    if !items.is_empty() {
        // Discord caps a select menu at 25 options
        let options: Vec<serenity::CreateSelectMenuOption> = items
            .iter()
            .take(25)
            .map(|item| {
                serenity::CreateSelectMenuOption::new(
                    format!("{} ({} RP)", item.item_name, item.item_price),
                    item.id.to_string(),
                )
            })
            .collect();
        let remove_menu = serenity::CreateSelectMenu::new(
            format!("remove_{}", cart.id),
            serenity::CreateSelectMenuKind::String { options },
        )
        .placeholder("Remove an item...");
        components.push(serenity::CreateActionRow::SelectMenu(remove_menu));
    }

    RenderedMessage::embed(embed).with_components(components)
}

/// The category selection screen.
#[must_use]
pub fn category_view(cart_id: i64, categories: &[String]) -> RenderedMessage {
    let embed = serenity::CreateEmbed::new()
        .title("🗂️ Browse Catalog")
        .description("Pick a category to see its items.")
        .colour(BRAND);

    let options: Vec<serenity::CreateSelectMenuOption> = categories
        .iter()
        .map(|c| serenity::CreateSelectMenuOption::new(display_category(c), c.clone()))
        .collect();

    let components = if options.is_empty() {
        vec![back_row(cart_id)]
    } else {
        vec![
            serenity::CreateActionRow::SelectMenu(
                serenity::CreateSelectMenu::new(
                    format!("category_{cart_id}"),
                    serenity::CreateSelectMenuKind::String { options },
                )
                .placeholder("Choose a category..."),
            ),
            back_row(cart_id),
        ]
    };

    RenderedMessage::embed(embed).with_components(components)
}

/// One page of catalog items, either a plain listing or search results.
#[must_use]
pub fn items_view(
    cart_id: i64,
    category: &str,
    page: &CatalogPage,
    search_query: Option<&str>,
) -> RenderedMessage {
    let title = search_query.map_or_else(
        || format!("📦 {}", display_category(category)),
        |q| format!("🔎 Results for \"{q}\""),
    );

    let mut description = String::new();
    if page.items.is_empty() {
        description.push_str("Nothing here.");
    } else {
        for item in &page.items {
            let _ = writeln!(description, "• **{}** - {} RP", item.name, item.price_rp);
        }
    }

    let embed = serenity::CreateEmbed::new()
        .title(title)
        .description(description)
        .colour(BRAND)
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Page {}/{} · {} items",
            page.page, page.total_pages, page.total_items
        )));

    let mut components = Vec::new();

    if !page.items.is_empty() {
        let options: Vec<serenity::CreateSelectMenuOption> = page
            .items
            .iter()
            .map(|item| {
                serenity::CreateSelectMenuOption::new(
                    format!("{} ({} RP)", item.name, item.price_rp),
                    item.id.to_string(),
                )
            })
            .collect();
        components.push(serenity::CreateActionRow::SelectMenu(
            serenity::CreateSelectMenu::new(
                format!("additem_{cart_id}"),
                serenity::CreateSelectMenuKind::String { options },
            )
            .placeholder("Add an item to your cart..."),
        ));
    }

    // Category goes last in the id so its underscores survive parsing
    let mut nav = Vec::new();
    if page.page > 1 {
        nav.push(
            serenity::CreateButton::new(format!("items_{}_{}_{}", cart_id, page.page - 1, category))
                .label("◀ Prev")
                .style(serenity::ButtonStyle::Secondary),
        );
    }
    if page.page < page.total_pages {
        nav.push(
            serenity::CreateButton::new(format!("items_{}_{}_{}", cart_id, page.page + 1, category))
                .label("Next ▶")
                .style(serenity::ButtonStyle::Secondary),
        );
    }
    nav.push(
        serenity::CreateButton::new(format!("cart_{cart_id}"))
            .label("Back to Cart")
            .style(serenity::ButtonStyle::Secondary),
    );
    components.push(serenity::CreateActionRow::Buttons(nav));

    RenderedMessage::embed(embed).with_components(components)
}

/// The checkout screen: order summary plus the delivery-account picker.
#[must_use]
pub fn checkout_view(
    cart: &cart::Model,
    items: &[cart_item::Model],
    targets: &[(EligibilityStatus, account::Model)],
) -> RenderedMessage {
    let mut summary = String::new();
    for item in items {
        let _ = writeln!(summary, "• **{}** - {} RP", item.item_name, item.item_price);
    }

    let mut delivery = String::new();
    let mut options = Vec::new();
    for (status, acc) in targets {
        let friendship = &status.friendship;
        if status.eligible {
            let _ = writeln!(
                delivery,
                "✅ **{}** ({}#{}) - ready",
                acc.nickname, friendship.game_nickname, friendship.game_tag
            );
            options.push(serenity::CreateSelectMenuOption::new(
                acc.nickname.clone(),
                friendship.id.to_string(),
            ));
        } else {
            let _ = writeln!(
                delivery,
                "⏳ **{}** ({}#{}) - {} days remaining",
                acc.nickname, friendship.game_nickname, friendship.game_tag, status.days_remaining
            );
        }
    }
    if targets.is_empty() {
        delivery.push_str(
            "You have no linked accounts. Use `/link` to add one, then wait out the friendship period.",
        );
    }

    let embed = serenity::CreateEmbed::new()
        .title("💳 Checkout")
        .description(summary)
        .field("Delivery accounts", delivery, false)
        .field("Total RP", cart.total_rp.to_string(), true)
        .field("Total", format!("€{:.2}", cart.total_price), true)
        .colour(AMBER)
        .footer(serenity::CreateEmbedFooter::new(format!("Cart #{}", cart.id)));

    let mut components = Vec::new();
    if !options.is_empty() {
        components.push(serenity::CreateActionRow::SelectMenu(
            serenity::CreateSelectMenu::new(
                format!("deliver_{}", cart.id),
                serenity::CreateSelectMenuKind::String { options },
            )
            .placeholder("Deliver to..."),
        ));
    }
    components.push(back_row(cart.id));

    RenderedMessage::embed(embed).with_components(components)
}

/// The order confirmation screen with payment instructions and the admin
/// review buttons.
#[must_use]
pub fn order_view(order: &order::Model, account_nickname: &str) -> RenderedMessage {
    let (colour, status_line) = match order.status.as_str() {
        order::status::COMPLETED => (GREEN, "✅ Completed - gifts on the way!"),
        order::status::REJECTED => (RED, "❌ Rejected - your cart has been reopened."),
        _ => (
            AMBER,
            "⏳ Awaiting payment. Send your payment proof in this channel; an admin will review it.",
        ),
    };

    let embed = serenity::CreateEmbed::new()
        .title(format!("📋 Order #{}", order.id))
        .description(status_line)
        .field("Delivery account", account_nickname.to_string(), true)
        .field("Total RP", order.total_rp.to_string(), true)
        .field("Total", format!("€{:.2}", order.total_price), true)
        .colour(colour)
        .footer(serenity::CreateEmbedFooter::new(
            "Admins: review with the buttons below",
        ));

    let components = if order.status == order::status::PENDING {
        vec![serenity::CreateActionRow::Buttons(vec![
            serenity::CreateButton::new(format!("orderapprove_{}", order.id))
                .label("Approve")
                .style(serenity::ButtonStyle::Success),
            serenity::CreateButton::new(format!("orderreject_{}", order.id))
                .label("Reject")
                .style(serenity::ButtonStyle::Danger),
        ])]
    } else {
        Vec::new()
    };

    RenderedMessage::embed(embed).with_components(components)
}

/// Admin notice for a new friendship request.
#[must_use]
pub fn friendship_request_view(
    requester: &str,
    account_nickname: &str,
    game_nickname: &str,
    game_tag: &str,
    friendship_id: i64,
) -> RenderedMessage {
    let embed = serenity::CreateEmbed::new()
        .title("🤝 Friendship Request")
        .description(format!(
            "**{requester}** wants to be added by **{account_nickname}**.\n\
             In-game: **{game_nickname}#{game_tag}**"
        ))
        .colour(AMBER);

    let components = vec![serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(format!("friendapprove_{friendship_id}"))
            .label("Approve")
            .style(serenity::ButtonStyle::Success),
        serenity::CreateButton::new(format!("friendreject_{friendship_id}"))
            .label("Reject")
            .style(serenity::ButtonStyle::Danger),
    ])];

    RenderedMessage::embed(embed).with_components(components)
}

/// Red ephemeral notice.
#[must_use]
pub fn error_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("❌ {title}"))
        .description(description.to_string())
        .colour(RED)
}

/// Green ephemeral notice.
#[must_use]
pub fn success_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("✅ {title}"))
        .description(description.to_string())
        .colour(GREEN)
}

/// Amber ephemeral notice.
#[must_use]
pub fn warning_embed(title: &str, description: &str) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(format!("⚠️ {title}"))
        .description(description.to_string())
        .colour(AMBER)
}

fn back_row(cart_id: i64) -> serenity::CreateActionRow {
    serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(format!("cart_{cart_id}"))
            .label("Back to Cart")
            .style(serenity::ButtonStyle::Secondary),
    ])
}

/// `"CHAMPION_SKIN"` reads as `"Champion Skin"` in the UI.
fn display_category(category: &str) -> String {
    category
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
