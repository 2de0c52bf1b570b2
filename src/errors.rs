//! Unified error types and result handling for `ShopBuddy`.
//!
//! All fallible operations in the crate return [`Result`], backed by the
//! single [`Error`] enum below. Domain failures carry enough context to
//! produce a useful user-facing message in the bot layer.

use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation failure
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error (config files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework error (boxed - serenity errors are large)
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),

    /// A monetary or RP amount failed validation
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending amount
        amount: f64,
    },

    /// No cart with the given id
    #[error("Cart {id} not found")]
    CartNotFound {
        /// Cart id that was looked up
        id: i64,
    },

    /// The cart exists but its status does not permit the operation
    #[error("Cart {id} cannot be modified (status: {status})")]
    CartNotActive {
        /// Cart id
        id: i64,
        /// Current cart status
        status: String,
    },

    /// Checkout attempted on a cart with no items
    #[error("Cart {id} is empty")]
    EmptyCart {
        /// Cart id
        id: i64,
    },

    /// No catalog item with the given id
    #[error("Catalog item {id} not found")]
    ItemNotFound {
        /// Catalog item id
        id: i64,
    },

    /// No gifting account with the given id
    #[error("Account {id} not found")]
    AccountNotFound {
        /// Account id
        id: i64,
    },

    /// No friendship with the given id
    #[error("Friendship {id} not found")]
    FriendshipNotFound {
        /// Friendship id
        id: i64,
    },

    /// A friendship (or pending request) already exists for this user/account pair
    #[error("Friendship with account '{account}' already exists")]
    DuplicateFriendship {
        /// Gifting account nickname
        account: String,
    },

    /// The friendship has not aged enough to receive gifts
    #[error("Friendship not eligible yet ({days_remaining} days remaining)")]
    FriendshipNotEligible {
        /// Days left until the minimum friendship age is reached
        days_remaining: i64,
    },

    /// No order with the given id
    #[error("Order {id} not found")]
    OrderNotFound {
        /// Order id
        id: i64,
    },

    /// String formatting error (embed field building)
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Integer conversion error (pagination limits)
    #[error("Integer conversion error: {0}")]
    TryFromInt(#[from] std::num::TryFromIntError),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
