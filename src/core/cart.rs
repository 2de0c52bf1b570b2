//! Cart business logic - lifecycle, item management, and totals.
//!
//! A ticket channel hosts at most one cart. Item names and prices are
//! snapshotted into the cart at add time; denormalized totals on the cart
//! row are recomputed inside a transaction whenever items change.

use crate::{
    entities::{Cart, CartItem, cart, cart_item, catalog_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Returns the active cart for a ticket channel, creating one if needed.
pub async fn get_or_create_cart(
    db: &DatabaseConnection,
    user_id: i64,
    ticket_channel_id: &str,
) -> Result<cart::Model> {
    if let Some(existing) = Cart::find()
        .filter(cart::Column::TicketChannelId.eq(ticket_channel_id))
        .filter(cart::Column::Status.eq(cart::status::ACTIVE))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let now = chrono::Utc::now();
    let model = cart::ActiveModel {
        user_id: Set(user_id),
        ticket_channel_id: Set(ticket_channel_id.to_string()),
        status: Set(cart::status::ACTIVE.to_string()),
        total_rp: Set(0),
        total_price: Set(0.0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds a cart by its unique id.
pub async fn get_cart_by_id(db: &DatabaseConnection, cart_id: i64) -> Result<Option<cart::Model>> {
    Cart::find_by_id(cart_id).one(db).await.map_err(Into::into)
}

/// Finds the cart hosted by a ticket channel, regardless of status.
pub async fn get_cart_by_channel(
    db: &DatabaseConnection,
    ticket_channel_id: &str,
) -> Result<Option<cart::Model>> {
    Cart::find()
        .filter(cart::Column::TicketChannelId.eq(ticket_channel_id))
        .order_by_desc(cart::Column::CreatedAt)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a cart's items in the order they were added.
pub async fn get_items(db: &DatabaseConnection, cart_id: i64) -> Result<Vec<cart_item::Model>> {
    CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .order_by_asc(cart_item::Column::AddedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Adds a catalog item to a cart, snapshotting its name and price.
///
/// Fails if the cart is not active or already contains the same catalog
/// item. Totals are recomputed in the same database transaction.
pub async fn add_item(
    db: &DatabaseConnection,
    cart_id: i64,
    item: &catalog_item::Model,
    eur_per_rp: f64,
) -> Result<cart_item::Model> {
    let cart = require_active_cart(db, cart_id).await?;

    let duplicate = CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .filter(cart_item::Column::CatalogItemId.eq(item.id))
        .one(db)
        .await?;
    if duplicate.is_some() {
        return Err(Error::Config {
            message: format!("'{}' is already in the cart", item.name),
        });
    }

    let txn = db.begin().await?;

    let model = cart_item::ActiveModel {
        cart_id: Set(cart.id),
        item_name: Set(item.name.clone()),
        item_price: Set(item.price_rp),
        image_url: Set(item.image_url.clone()),
        category: Set(Some(item.category.clone())),
        catalog_item_id: Set(Some(item.id)),
        added_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let inserted = model.insert(&txn).await?;

    recalculate_totals(&txn, cart.id, eur_per_rp).await?;
    txn.commit().await?;

    Ok(inserted)
}

/// Removes an item from a cart and recomputes the totals.
pub async fn remove_item(
    db: &DatabaseConnection,
    cart_id: i64,
    cart_item_id: i64,
    eur_per_rp: f64,
) -> Result<()> {
    let cart = require_active_cart(db, cart_id).await?;

    let txn = db.begin().await?;

    let deleted = CartItem::delete_many()
        .filter(cart_item::Column::Id.eq(cart_item_id))
        .filter(cart_item::Column::CartId.eq(cart.id))
        .exec(&txn)
        .await?;
    if deleted.rows_affected == 0 {
        return Err(Error::ItemNotFound { id: cart_item_id });
    }

    recalculate_totals(&txn, cart.id, eur_per_rp).await?;
    txn.commit().await?;

    Ok(())
}

/// Transitions a cart to a new status, bumping `updated_at`.
pub async fn set_status(
    db: &DatabaseConnection,
    cart_id: i64,
    new_status: &str,
) -> Result<cart::Model> {
    let cart = Cart::find_by_id(cart_id)
        .one(db)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;

    let mut model: cart::ActiveModel = cart.into();
    model.status = Set(new_status.to_string());
    model.updated_at = Set(chrono::Utc::now());

    Ok(model.update(db).await?)
}

/// Cancels an active cart.
pub async fn cancel_cart(db: &DatabaseConnection, cart_id: i64) -> Result<cart::Model> {
    require_active_cart(db, cart_id).await?;
    set_status(db, cart_id, cart::status::CANCELLED).await
}

async fn require_active_cart(db: &DatabaseConnection, cart_id: i64) -> Result<cart::Model> {
    let cart = Cart::find_by_id(cart_id)
        .one(db)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;

    if cart.status != cart::status::ACTIVE {
        return Err(Error::CartNotActive {
            id: cart.id,
            status: cart.status,
        });
    }
    Ok(cart)
}

/// Recomputes the denormalized RP and EUR totals from the cart's items.
async fn recalculate_totals<C>(db: &C, cart_id: i64, eur_per_rp: f64) -> Result<()>
where
    C: ConnectionTrait,
{
    let items = CartItem::find()
        .filter(cart_item::Column::CartId.eq(cart_id))
        .all(db)
        .await?;

    let total_rp: i64 = items.iter().map(|i| i.item_price).sum();
    let total_price = crate::core::pricing::price_for_rp(total_rp, eur_per_rp);

    let cart = Cart::find_by_id(cart_id)
        .one(db)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;

    let mut model: cart::ActiveModel = cart.into();
    model.total_rp = Set(total_rp);
    model.total_price = Set(total_price);
    model.updated_at = Set(chrono::Utc::now());
    model.update(db).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::{create_test_catalog_item, create_test_user, setup_test_db};

    #[tokio::test]
    async fn test_get_or_create_cart_reuses_active() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;

        let first = get_or_create_cart(&db, user.id, "channel-1").await?;
        let second = get_or_create_cart(&db, user.id, "channel-1").await?;
        assert_eq!(first.id, second.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_updates_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let cart = get_or_create_cart(&db, user.id, "channel-1").await?;
        let skin = create_test_catalog_item(&db, "Dragon Slayer", "CHAMPION_SKIN", 1350).await?;
        let chroma = create_test_catalog_item(&db, "Ruby Chroma", "CHROMA", 290).await?;

        add_item(&db, cart.id, &skin, 0.01).await?;
        add_item(&db, cart.id, &chroma, 0.01).await?;

        let cart = get_cart_by_id(&db, cart.id).await?.unwrap();
        assert_eq!(cart.total_rp, 1640);
        assert_eq!(cart.total_price, 16.4);
        assert_eq!(get_items(&db, cart.id).await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_item_rejects_duplicates() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let cart = get_or_create_cart(&db, user.id, "channel-1").await?;
        let skin = create_test_catalog_item(&db, "Dragon Slayer", "CHAMPION_SKIN", 1350).await?;

        add_item(&db, cart.id, &skin, 0.01).await?;
        let result = add_item(&db, cart.id, &skin, 0.01).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_item_recomputes_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let cart = get_or_create_cart(&db, user.id, "channel-1").await?;
        let skin = create_test_catalog_item(&db, "Dragon Slayer", "CHAMPION_SKIN", 1350).await?;
        let added = add_item(&db, cart.id, &skin, 0.01).await?;

        remove_item(&db, cart.id, added.id, 0.01).await?;

        let cart = get_cart_by_id(&db, cart.id).await?.unwrap();
        assert_eq!(cart.total_rp, 0);
        assert!(get_items(&db, cart.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_closed_cart_rejects_changes() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let cart = get_or_create_cart(&db, user.id, "channel-1").await?;
        let skin = create_test_catalog_item(&db, "Dragon Slayer", "CHAMPION_SKIN", 1350).await?;

        set_status(&db, cart.id, cart::status::PENDING_PAYMENT).await?;

        let result = add_item(&db, cart.id, &skin, 0.01).await;
        assert!(matches!(result, Err(Error::CartNotActive { .. })));

        // A new cart can be opened in the same channel once the old one closed
        let fresh = get_or_create_cart(&db, user.id, "channel-2").await?;
        assert_ne!(fresh.id, cart.id);
        Ok(())
    }
}
