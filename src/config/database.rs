//! Database configuration module for `ShopBuddy`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary tables
//! based on the entity definitions. The module uses `SeaORM`'s `Schema::create_table_from_entity`
//! method to automatically generate SQL statements from the entity models, ensuring that the
//! database schema matches the Rust struct definitions without requiring manual SQL.

use crate::entities::{Account, Cart, CartItem, CatalogItem, Friendship, Order, Setting, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
/// This function handles connection errors and provides a clean interface for database access
/// throughout the application.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/shop_buddy.sqlite".to_string());

    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// This function uses the `DeriveEntityModel` macros to automatically generate proper SQL
/// statements for table creation, ensuring the database schema matches the Rust struct
/// definitions. It creates tables for users, accounts, friendships, carts, cart items,
/// orders, catalog items, and settings.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let user_table = schema.create_table_from_entity(User);
    let account_table = schema.create_table_from_entity(Account);
    let friendship_table = schema.create_table_from_entity(Friendship);
    let cart_table = schema.create_table_from_entity(Cart);
    let cart_item_table = schema.create_table_from_entity(CartItem);
    let order_table = schema.create_table_from_entity(Order);
    let catalog_item_table = schema.create_table_from_entity(CatalogItem);
    let setting_table = schema.create_table_from_entity(Setting);

    db.execute(builder.build(&user_table)).await?;
    db.execute(builder.build(&account_table)).await?;
    db.execute(builder.build(&friendship_table)).await?;
    db.execute(builder.build(&cart_table)).await?;
    db.execute(builder.build(&cart_item_table)).await?;
    db.execute(builder.build(&order_table)).await?;
    db.execute(builder.build(&catalog_item_table)).await?;
    db.execute(builder.build(&setting_table)).await?;

    Ok(())
}
