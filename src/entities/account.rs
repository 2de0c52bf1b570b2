//! Account entity - Represents a gifting account owned by the shop.
//!
//! Each account holds an RP balance used to send gifts, a friend counter
//! against the in-game friend-list cap, and a region. Customers link to an
//! account through a friendship before they can receive gifts from it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Gifting account database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Unique identifier for the account
    #[sea_orm(primary_key)]
    pub id: i64,
    /// In-game nickname of the account
    pub nickname: String,
    /// Current RP balance available for gifting
    pub rp_balance: i64,
    /// Number of friends currently on the account
    pub friends_count: i32,
    /// Friend-list capacity of the account
    pub max_friends: i32,
    /// Server region the account lives on (e.g., "BR", "EUW")
    pub region: String,
    /// When this account was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Account and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One account has many friendships
    #[sea_orm(has_many = "super::friendship::Entity")]
    Friendships,
}

impl Related<super::friendship::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Friendships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
