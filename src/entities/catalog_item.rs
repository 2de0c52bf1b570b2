//! Catalog item entity - A purchasable item in the shop catalog.
//!
//! Items are grouped by category for browsing and can be deactivated
//! without deleting them (they stay referenced by historical cart items).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "catalog_items")]
pub struct Model {
    /// Unique identifier for the catalog item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the item
    pub name: String,
    /// Browsing category (e.g., `"CHAMPION_SKIN"`, `"CHROMA"`)
    pub category: String,
    /// Price in RP
    pub price_rp: i64,
    /// Splash/preview image URL
    pub image_url: Option<String>,
    /// Whether the item is currently purchasable
    pub is_active: bool,
}

/// Defines relationships between `CatalogItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
