//! Catalog management commands (admin only).

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, Error},
        core::catalog,
        errors::Result,
    };
    use std::fmt::Write as _;

    /// Manage the shop catalog.
    #[poise::command(
        slash_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands("catalog_add", "catalog_remove", "catalog_list")
    )]
    pub async fn catalog(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Catalog management subcommands: `add`, `remove`, `list`.")
            .await?;
        Ok(())
    }

    /// Adds an item to the catalog.
    #[poise::command(slash_command, rename = "add")]
    pub async fn catalog_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name"] name: String,
        #[description = "Category (e.g. CHAMPION_SKIN)"] category: String,
        #[description = "Price in RP"] price_rp: i64,
        #[description = "Splash image URL"] image_url: Option<String>,
    ) -> Result<()> {
        let created = catalog::create_item(
            &ctx.data().database,
            name,
            category.to_uppercase(),
            price_rp,
            image_url,
        )
        .await?;

        ctx.say(format!(
            "Added `{}` - **{}** ({}, {} RP).",
            created.id, created.name, created.category, created.price_rp
        ))
        .await?;
        Ok(())
    }

    /// Removes (deactivates) a catalog item.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn catalog_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Id of the item to remove"] item_id: i64,
    ) -> Result<()> {
        catalog::deactivate_item(&ctx.data().database, item_id).await?;
        ctx.say(format!("Item `{item_id}` removed from the catalog."))
            .await?;
        Ok(())
    }

    /// Lists one page of a category.
    #[poise::command(slash_command, rename = "list")]
    pub async fn catalog_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category to list"] category: String,
        #[description = "Page number (default 1)"] page: Option<u64>,
    ) -> Result<()> {
        let page = catalog::get_items_page(
            &ctx.data().database,
            &category.to_uppercase(),
            page.unwrap_or(1),
        )
        .await?;

        if page.items.is_empty() {
            ctx.say("No items in that category.").await?;
            return Ok(());
        }

        let mut text = format!(
            "**{}** - page {}/{} ({} items)\n",
            category.to_uppercase(),
            page.page,
            page.total_pages,
            page.total_items
        );
        for item in &page.items {
            writeln!(&mut text, "• `{}` **{}** - {} RP", item.id, item.name, item.price_rp)?;
        }
        ctx.say(text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
