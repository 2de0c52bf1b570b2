//! Discord command implementations.
//!
//! General commands are available to everyone; the management commands
//! (`/account`, `/catalog`, `/price`, `/revenue`) require the Manage Server
//! permission.

/// Gifting account management (admin)
pub mod account;
/// Catalog management (admin)
pub mod catalog;
/// General commands - ping, help, shopstats
pub mod general;
/// Price rate management (admin)
pub mod price;
/// Revenue reporting (admin)
pub mod revenue;
/// Client-facing shop commands - shop, search, link
pub mod shop;

pub use account::*;
pub use catalog::*;
pub use general::*;
pub use price::*;
pub use revenue::*;
pub use shop::*;
