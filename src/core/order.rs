//! Order business logic - checkout, approval flow, and revenue reporting.
//!
//! Orders freeze a cart's totals at checkout time and carry the manual
//! payment workflow: the user submits a proof, an admin approves or
//! rejects. Approval deducts RP from the gifting account and completes the
//! cart; rejection reopens the cart for changes.

use crate::{
    core::friendship::evaluate_eligibility,
    entities::{Order, cart, friendship, order},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Aggregated totals over completed orders, for the `/revenue` report.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    /// Number of completed orders in the window
    pub order_count: u64,
    /// Total RP delivered
    pub total_rp: i64,
    /// Total EUR collected
    pub total_eur: f64,
}

/// Creates a pending order from an active, non-empty cart.
///
/// The selected friendship must be approved and past the minimum age; the
/// cart transitions to `pending_payment` in the same transaction.
pub async fn create_order(
    db: &DatabaseConnection,
    cart_model: &cart::Model,
    friendship_model: &friendship::Model,
    min_friendship_days: i64,
) -> Result<order::Model> {
    if cart_model.status != cart::status::ACTIVE {
        return Err(Error::CartNotActive {
            id: cart_model.id,
            status: cart_model.status.clone(),
        });
    }
    if cart_model.total_rp == 0 {
        return Err(Error::EmptyCart { id: cart_model.id });
    }

    let status = evaluate_eligibility(
        friendship_model.clone(),
        min_friendship_days,
        chrono::Utc::now(),
    );
    if !status.eligible {
        return Err(Error::FriendshipNotEligible {
            days_remaining: status.days_remaining.max(1),
        });
    }

    let txn = db.begin().await?;

    let model = order::ActiveModel {
        cart_id: Set(cart_model.id),
        user_id: Set(cart_model.user_id),
        friendship_id: Set(friendship_model.id),
        status: Set(order::status::PENDING.to_string()),
        payment_method: Set(None),
        payment_proof: Set(None),
        total_rp: Set(cart_model.total_rp),
        total_price: Set(cart_model.total_price),
        completed_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let inserted = model.insert(&txn).await?;

    let mut cart_update: cart::ActiveModel = cart_model.clone().into();
    cart_update.status = Set(cart::status::PENDING_PAYMENT.to_string());
    cart_update.updated_at = Set(chrono::Utc::now());
    cart_update.update(&txn).await?;

    txn.commit().await?;
    Ok(inserted)
}

/// Finds the pending order created from a cart, if any.
///
/// Used to attach a payment proof posted in the cart's ticket channel.
pub async fn get_pending_order_for_cart(
    db: &DatabaseConnection,
    cart_id: i64,
) -> Result<Option<order::Model>> {
    Order::find()
        .filter(order::Column::CartId.eq(cart_id))
        .filter(order::Column::Status.eq(order::status::PENDING))
        .order_by_desc(order::Column::CreatedAt)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds an order by its unique id.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<order::Model>> {
    Order::find_by_id(order_id).one(db).await.map_err(Into::into)
}

/// Records the user's payment method and proof on a pending order.
pub async fn attach_payment_proof(
    db: &DatabaseConnection,
    order_id: i64,
    payment_method: String,
    payment_proof: String,
) -> Result<order::Model> {
    let order = require_pending_order(db, order_id).await?;

    let mut model: order::ActiveModel = order.into();
    model.payment_method = Set(Some(payment_method));
    model.payment_proof = Set(Some(payment_proof));

    Ok(model.update(db).await?)
}

/// Approves a pending order.
///
/// Deducts the order's RP from the gifting account behind the selected
/// friendship and completes both the order and its cart, atomically with
/// respect to concurrent approvals of other orders on the same account.
pub async fn approve_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let order = require_pending_order(db, order_id).await?;

    let friendship_model = crate::core::friendship::get_friendship_by_id(db, order.friendship_id)
        .await?
        .ok_or(Error::FriendshipNotFound {
            id: order.friendship_id,
        })?;

    // The balance check and deduction are atomic at the account level
    crate::core::account::adjust_rp_balance(db, friendship_model.account_id, -order.total_rp)
        .await?;

    let txn = db.begin().await?;

    let now = chrono::Utc::now();
    let cart_id = order.cart_id;
    let mut model: order::ActiveModel = order.into();
    model.status = Set(order::status::COMPLETED.to_string());
    model.completed_at = Set(Some(now));
    let completed = model.update(&txn).await?;

    let cart_model = crate::entities::Cart::find_by_id(cart_id)
        .one(&txn)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;
    let mut cart_update: cart::ActiveModel = cart_model.into();
    cart_update.status = Set(cart::status::COMPLETED.to_string());
    cart_update.updated_at = Set(now);
    cart_update.update(&txn).await?;

    txn.commit().await?;
    Ok(completed)
}

/// Rejects a pending order and reopens its cart for changes.
pub async fn reject_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let order = require_pending_order(db, order_id).await?;

    let txn = db.begin().await?;

    let cart_id = order.cart_id;
    let mut model: order::ActiveModel = order.into();
    model.status = Set(order::status::REJECTED.to_string());
    let rejected = model.update(&txn).await?;

    let cart_model = crate::entities::Cart::find_by_id(cart_id)
        .one(&txn)
        .await?
        .ok_or(Error::CartNotFound { id: cart_id })?;
    let mut cart_update: cart::ActiveModel = cart_model.into();
    cart_update.status = Set(cart::status::ACTIVE.to_string());
    cart_update.updated_at = Set(chrono::Utc::now());
    cart_update.update(&txn).await?;

    txn.commit().await?;
    Ok(rejected)
}

/// Summarizes completed orders since `since` (or all time when None).
pub async fn revenue_since(
    db: &DatabaseConnection,
    since: Option<DateTime<Utc>>,
) -> Result<RevenueSummary> {
    let mut query = Order::find()
        .filter(order::Column::Status.eq(order::status::COMPLETED))
        .order_by_desc(order::Column::CompletedAt);

    if let Some(since) = since {
        query = query.filter(order::Column::CompletedAt.gte(since));
    }

    let orders = query.all(db).await?;

    Ok(RevenueSummary {
        order_count: orders.len() as u64,
        total_rp: orders.iter().map(|o| o.total_rp).sum(),
        total_eur: orders.iter().map(|o| o.total_price).sum(),
    })
}

async fn require_pending_order(db: &DatabaseConnection, order_id: i64) -> Result<order::Model> {
    let order = Order::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    if order.status != order::status::PENDING {
        return Err(Error::OrderNotFound { id: order_id });
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{account, cart as cart_core};
    use crate::test_utils::{
        create_approved_friendship, create_test_account, create_test_catalog_item,
        create_test_user, setup_test_db,
    };

    async fn checkout_fixture(
        db: &sea_orm::DatabaseConnection,
    ) -> Result<(cart::Model, friendship::Model)> {
        let user = create_test_user(db, "111").await?;
        let acc = create_test_account(db, "Gifter").await?;
        let friendship = create_approved_friendship(db, user.id, acc.id, 10).await?;

        let cart_model = cart_core::get_or_create_cart(db, user.id, "channel-1").await?;
        let skin = create_test_catalog_item(db, "Dragon Slayer", "CHAMPION_SKIN", 1350).await?;
        cart_core::add_item(db, cart_model.id, &skin, 0.01).await?;
        let cart_model = cart_core::get_cart_by_id(db, cart_model.id).await?.unwrap();

        Ok((cart_model, friendship))
    }

    #[tokio::test]
    async fn test_create_order_freezes_totals() -> Result<()> {
        let db = setup_test_db().await?;
        let (cart_model, friendship_model) = checkout_fixture(&db).await?;

        let order = create_order(&db, &cart_model, &friendship_model, 7).await?;
        assert_eq!(order.total_rp, 1350);
        assert_eq!(order.total_price, 13.5);
        assert_eq!(order.status, order::status::PENDING);

        let cart_after = cart_core::get_cart_by_id(&db, cart_model.id).await?.unwrap();
        assert_eq!(cart_after.status, cart::status::PENDING_PAYMENT);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let acc = create_test_account(&db, "Gifter").await?;
        let friendship_model = create_approved_friendship(&db, user.id, acc.id, 10).await?;
        let cart_model = cart_core::get_or_create_cart(&db, user.id, "channel-1").await?;

        let result = create_order(&db, &cart_model, &friendship_model, 7).await;
        assert!(matches!(result, Err(Error::EmptyCart { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_rejects_young_friendship() -> Result<()> {
        let db = setup_test_db().await?;
        let (cart_model, _) = checkout_fixture(&db).await?;
        let user = create_test_user(&db, "111").await?;
        let acc2 = create_test_account(&db, "FreshGifter").await?;
        let young = create_approved_friendship(&db, user.id, acc2.id, 2).await?;

        let result = create_order(&db, &cart_model, &young, 7).await;
        assert!(matches!(
            result,
            Err(Error::FriendshipNotEligible { days_remaining: 5 })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_approve_order_deducts_rp_and_completes_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let (cart_model, friendship_model) = checkout_fixture(&db).await?;
        let order = create_order(&db, &cart_model, &friendship_model, 7).await?;
        attach_payment_proof(
            &db,
            order.id,
            "PIX".to_string(),
            "https://example.com/proof.png".to_string(),
        )
        .await?;

        let before = account::get_account_by_id(&db, friendship_model.account_id)
            .await?
            .unwrap();
        let completed = approve_order(&db, order.id).await?;

        assert_eq!(completed.status, order::status::COMPLETED);
        assert!(completed.completed_at.is_some());

        let after = account::get_account_by_id(&db, friendship_model.account_id)
            .await?
            .unwrap();
        assert_eq!(after.rp_balance, before.rp_balance - 1350);

        let cart_after = cart_core::get_cart_by_id(&db, cart_model.id).await?.unwrap();
        assert_eq!(cart_after.status, cart::status::COMPLETED);
        Ok(())
    }

    #[tokio::test]
    async fn test_reject_order_reopens_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let (cart_model, friendship_model) = checkout_fixture(&db).await?;
        let order = create_order(&db, &cart_model, &friendship_model, 7).await?;

        let rejected = reject_order(&db, order.id).await?;
        assert_eq!(rejected.status, order::status::REJECTED);

        let cart_after = cart_core::get_cart_by_id(&db, cart_model.id).await?.unwrap();
        assert_eq!(cart_after.status, cart::status::ACTIVE);

        // A rejected order cannot be approved afterwards
        assert!(matches!(
            approve_order(&db, order.id).await,
            Err(Error::OrderNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_revenue_counts_only_completed() -> Result<()> {
        let db = setup_test_db().await?;
        let (cart_model, friendship_model) = checkout_fixture(&db).await?;
        let order = create_order(&db, &cart_model, &friendship_model, 7).await?;

        // Pending orders are not revenue
        assert_eq!(revenue_since(&db, None).await?.order_count, 0);

        approve_order(&db, order.id).await?;
        let summary = revenue_since(&db, None).await?;
        assert_eq!(summary.order_count, 1);
        assert_eq!(summary.total_rp, 1350);
        assert_eq!(summary.total_eur, 13.5);

        // A window starting in the future excludes it again
        let future = chrono::Utc::now() + chrono::Duration::hours(1);
        assert_eq!(revenue_since(&db, Some(future)).await?.order_count, 0);
        Ok(())
    }
}
