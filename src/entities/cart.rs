//! Cart entity - One shopping cart per ticket channel.
//!
//! The ticket channel id is unique: a channel hosts at most one cart.
//! Totals are denormalized and recomputed whenever items change.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart lifecycle states
pub mod status {
    /// Open for item changes
    pub const ACTIVE: &str = "active";
    /// Checkout started, awaiting payment proof
    pub const PENDING_PAYMENT: &str = "pending_payment";
    /// Order approved and delivered
    pub const COMPLETED: &str = "completed";
    /// Abandoned or cancelled by the user
    pub const CANCELLED: &str = "cancelled";
}

/// Cart database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    /// Unique identifier for the cart
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning user
    pub user_id: i64,
    /// Discord id of the ticket channel hosting this cart
    #[sea_orm(unique)]
    pub ticket_channel_id: String,
    /// Cart status: `"active"`, `"pending_payment"`, `"completed"`, or `"cancelled"`
    pub status: String,
    /// Sum of item prices in RP
    pub total_rp: i64,
    /// Total price in EUR derived from the configured rate
    pub total_price: f64,
    /// When the cart was created
    pub created_at: DateTimeUtc,
    /// When the cart was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Cart and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// One cart has many items
    #[sea_orm(has_many = "super::cart_item::Entity")]
    Items,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
