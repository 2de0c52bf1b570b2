//! User entity - Represents a Discord user known to the shop.
//!
//! Users are created lazily the first time they interact with the shop
//! (opening a ticket, requesting a friendship). The Discord snowflake is
//! stored as text and is unique per user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user id (snowflake, stored as text)
    #[sea_orm(unique)]
    pub discord_id: String,
    /// Discord username at the time of first contact
    pub username: String,
    /// When this user was first seen
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many carts
    #[sea_orm(has_many = "super::cart::Entity")]
    Carts,
    /// One user has many friendships
    #[sea_orm(has_many = "super::friendship::Entity")]
    Friendships,
    /// One user has many orders
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Carts.def()
    }
}

impl Related<super::friendship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Friendships.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
