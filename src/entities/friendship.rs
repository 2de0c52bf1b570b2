//! Friendship entity - Links a user to a gifting account.
//!
//! A friendship starts as a pending request carrying the customer's in-game
//! nickname and tag, and is approved or rejected by an admin. Gift
//! eligibility is counted in days from `approved_at`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Friendship request lifecycle states
pub mod status {
    /// Awaiting admin review
    pub const PENDING: &str = "pending";
    /// Approved - eligibility clock runs from `approved_at`
    pub const APPROVED: &str = "approved";
    /// Rejected by an admin
    pub const REJECTED: &str = "rejected";
}

/// Friendship database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "friendships")]
pub struct Model {
    /// Unique identifier for the friendship
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the requesting user
    pub user_id: i64,
    /// ID of the gifting account
    pub account_id: i64,
    /// Customer's in-game nickname
    pub game_nickname: String,
    /// Customer's in-game tagline (the part after '#')
    pub game_tag: String,
    /// Request state: `"pending"`, `"approved"`, or `"rejected"`
    pub status: String,
    /// When the request was created
    pub created_at: DateTimeUtc,
    /// When an admin approved the request, if it was approved
    pub approved_at: Option<DateTimeUtc>,
}

/// Defines relationships between Friendship and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each friendship belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    /// Each friendship targets one gifting account
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
