//! Cart item entity - A catalog item snapshot inside a cart.
//!
//! Name and price are copied from the catalog at add time so later catalog
//! edits do not change what the customer agreed to pay.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cart_items")]
pub struct Model {
    /// Unique identifier for the cart item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the owning cart
    pub cart_id: i64,
    /// Item name at the time it was added
    pub item_name: String,
    /// Item price in RP at the time it was added
    pub item_price: i64,
    /// Splash/preview image URL, if the catalog had one
    pub image_url: Option<String>,
    /// Catalog category the item came from
    pub category: Option<String>,
    /// ID of the originating catalog item, if still known
    pub catalog_item_id: Option<i64>,
    /// When the item was added to the cart
    pub added_at: DateTimeUtc,
}

/// Defines relationships between `CartItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each cart item belongs to one cart
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id"
    )]
    Cart,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
