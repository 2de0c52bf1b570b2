//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod account;
pub mod cart;
pub mod cart_item;
pub mod catalog_item;
pub mod friendship;
pub mod order;
pub mod setting;
pub mod user;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use cart::{Column as CartColumn, Entity as Cart, Model as CartModel};
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use catalog_item::{
    Column as CatalogItemColumn, Entity as CatalogItem, Model as CatalogItemModel,
};
pub use friendship::{Column as FriendshipColumn, Entity as Friendship, Model as FriendshipModel};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use setting::{Column as SettingColumn, Entity as Setting, Model as SettingModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
