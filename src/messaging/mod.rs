//! Client message lifecycle management.
//!
//! Every screen the bot shows a customer inside a ticket channel goes
//! through the [`MessageCoordinator`]: it decides whether to edit the
//! channel's current UI message or create a new one, tracks per-channel
//! message state, and reclaims stale or duplicate bot messages. The
//! coordinator talks to Discord only through the [`ClientChannel`] trait,
//! which keeps it testable against an in-memory fake.

/// Channel and message abstractions the coordinator operates on
pub mod channel;
/// The edit-vs-create decision engine and its cache
pub mod coordinator;
/// Serenity-backed implementations of the channel abstractions
pub mod discord;

pub use channel::{ClientChannel, ClientMessage, RenderedMessage};
pub use coordinator::{CoordinatorStats, MessageCoordinator};
pub use discord::DiscordChannel;
