//! Order entity - A checked-out cart awaiting manual fulfillment.
//!
//! Orders are created at checkout, collect a payment proof from the user,
//! and are approved or rejected by an admin. Approval deducts RP from the
//! gifting account and completes the cart.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Order lifecycle states
pub mod status {
    /// Created at checkout, awaiting payment proof and review
    pub const PENDING: &str = "pending";
    /// Approved and delivered
    pub const COMPLETED: &str = "completed";
    /// Rejected by an admin (cart is reopened)
    pub const REJECTED: &str = "rejected";
}

/// Order database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    /// Unique identifier for the order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the cart this order was created from
    pub cart_id: i64,
    /// ID of the ordering user
    pub user_id: i64,
    /// ID of the friendship selected as the delivery target
    pub friendship_id: i64,
    /// Order status: `"pending"`, `"completed"`, or `"rejected"`
    pub status: String,
    /// Payment method declared by the user, if any
    pub payment_method: Option<String>,
    /// Payment proof reference (attachment URL), if submitted
    pub payment_proof: Option<String>,
    /// Total in RP, snapshotted from the cart at checkout
    pub total_rp: i64,
    /// Total price in EUR, snapshotted from the cart at checkout
    pub total_price: f64,
    /// When the order was completed, if it was
    pub completed_at: Option<DateTimeUtc>,
    /// When the order was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Order and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order was created from one cart
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id"
    )]
    Cart,
    /// Each order belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each order delivers through one friendship
    #[sea_orm(
        belongs_to = "super::friendship::Entity",
        from = "Column::FriendshipId",
        to = "super::friendship::Column::Id"
    )]
    Friendship,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::friendship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Friendship.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
