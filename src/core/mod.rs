//! Core business logic - framework-agnostic shop operations.
//!
//! Every module here operates on a `SeaORM` connection and returns structured
//! data for the bot layer to format. Nothing in `core` touches Discord.

/// Gifting account operations
pub mod account;
/// Cart lifecycle and item management
pub mod cart;
/// Catalog browsing, search, and seeding
pub mod catalog;
/// Friendship requests, approval, and gift eligibility
pub mod friendship;
/// Order creation, approval flow, and revenue reporting
pub mod order;
/// Persisted price rate and price derivation
pub mod pricing;
/// User lookup and lazy registration
pub mod user;
