//! Catalog business logic - browsing, search, and seeding.
//!
//! The client UI pages through catalog items one category at a time, so the
//! listing and search functions here are category-scoped and paginated.

use crate::{
    config::settings::CatalogItemConfig,
    entities::{CatalogItem, catalog_item},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};

/// Number of items shown per page in the client UI
pub const PAGE_SIZE: u64 = 10;

/// A single page of catalog items plus paging metadata
#[derive(Debug, Clone)]
pub struct CatalogPage {
    /// Items on this page
    pub items: Vec<catalog_item::Model>,
    /// 1-based page number
    pub page: u64,
    /// Total number of pages (at least 1)
    pub total_pages: u64,
    /// Total matching items across all pages
    pub total_items: u64,
}

/// Adds a new item to the catalog.
pub async fn create_item(
    db: &DatabaseConnection,
    name: String,
    category: String,
    price_rp: i64,
    image_url: Option<String>,
) -> Result<catalog_item::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Catalog item name cannot be empty".to_string(),
        });
    }

    #[allow(clippy::cast_precision_loss)] // RP amounts are far below 2^52
    if price_rp <= 0 {
        return Err(Error::InvalidAmount {
            amount: price_rp as f64,
        });
    }

    let model = catalog_item::ActiveModel {
        name: Set(name.trim().to_string()),
        category: Set(category),
        price_rp: Set(price_rp),
        image_url: Set(image_url),
        is_active: Set(true),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds an active catalog item by id.
pub async fn get_item_by_id(
    db: &DatabaseConnection,
    item_id: i64,
) -> Result<Option<catalog_item::Model>> {
    CatalogItem::find_by_id(item_id)
        .filter(catalog_item::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Deactivates a catalog item so it can no longer be purchased.
///
/// Historical cart items keep their snapshot of the name and price.
pub async fn deactivate_item(db: &DatabaseConnection, item_id: i64) -> Result<()> {
    let item = CatalogItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let mut model: catalog_item::ActiveModel = item.into();
    model.is_active = Set(false);
    model.update(db).await?;
    Ok(())
}

/// Returns the distinct categories that currently have active items.
pub async fn get_categories(db: &DatabaseConnection) -> Result<Vec<String>> {
    let items = CatalogItem::find()
        .filter(catalog_item::Column::IsActive.eq(true))
        .order_by_asc(catalog_item::Column::Category)
        .all(db)
        .await?;

    let mut categories: Vec<String> = items.into_iter().map(|i| i.category).collect();
    categories.dedup();
    Ok(categories)
}

/// Returns one page of active items in a category, ordered by name.
pub async fn get_items_page(
    db: &DatabaseConnection,
    category: &str,
    page: u64,
) -> Result<CatalogPage> {
    let paginator = CatalogItem::find()
        .filter(catalog_item::Column::IsActive.eq(true))
        .filter(catalog_item::Column::Category.eq(category))
        .order_by_asc(catalog_item::Column::Name)
        .paginate(db, PAGE_SIZE);

    page_from_paginator(paginator, page).await
}

/// Case-insensitive substring search over active items in a category.
pub async fn search_items(
    db: &DatabaseConnection,
    category: &str,
    query: &str,
    page: u64,
) -> Result<CatalogPage> {
    use sea_orm::sea_query::{Expr, Func};

    let pattern = format!("%{}%", query.trim().to_lowercase());
    let paginator = CatalogItem::find()
        .filter(catalog_item::Column::IsActive.eq(true))
        .filter(catalog_item::Column::Category.eq(category))
        .filter(Expr::expr(Func::lower(Expr::col(catalog_item::Column::Name))).like(pattern))
        .order_by_asc(catalog_item::Column::Name)
        .paginate(db, PAGE_SIZE);

    page_from_paginator(paginator, page).await
}

async fn page_from_paginator<'db, C>(
    paginator: sea_orm::Paginator<'db, C, sea_orm::SelectModel<catalog_item::Model>>,
    page: u64,
) -> Result<CatalogPage>
where
    C: sea_orm::ConnectionTrait,
{
    let total_items = paginator.num_items().await?;
    let total_pages = paginator.num_pages().await?.max(1);
    let page = page.clamp(1, total_pages);
    // Paginator pages are 0-based
    let items = paginator.fetch_page(page - 1).await?;

    Ok(CatalogPage {
        items,
        page,
        total_pages,
        total_items,
    })
}

/// Seeds catalog items from the config file.
///
/// Items are matched by name; existing ones are left untouched so manual
/// edits and deactivations survive restarts. Returns how many were created.
pub async fn seed_catalog(db: &DatabaseConnection, seeds: &[CatalogItemConfig]) -> Result<usize> {
    let mut created = 0;

    for seed in seeds {
        let exists = CatalogItem::find()
            .filter(catalog_item::Column::Name.eq(&seed.name))
            .one(db)
            .await?;

        if exists.is_none() {
            create_item(
                db,
                seed.name.clone(),
                seed.category.clone(),
                seed.price_rp,
                seed.image_url.clone(),
            )
            .await?;
            created += 1;
        }
    }

    if created > 0 {
        tracing::info!("Seeded {created} catalog items from config");
    }
    Ok(created)
}
