//! Channel and message abstractions consumed by the coordinator.
//!
//! The coordinator never talks to serenity directly; it sees a channel as
//! something that can fetch, list, and send messages, and a message as
//! something that can be edited, deleted, and inspected for author, age,
//! and embed presence. The production implementation lives in
//! [`super::discord`]; tests use an in-memory fake.

use crate::errors::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;

/// The payload the coordinator displays - embeds plus optional components
/// and text content. The coordinator treats it as opaque: it is passed to
/// send/edit unchanged and never inspected.
#[derive(Clone, Debug, Default)]
pub struct RenderedMessage {
    /// Structured embeds (the client UI always carries at least one)
    pub embeds: Vec<serenity::CreateEmbed>,
    /// Interactive components (buttons, select menus)
    pub components: Vec<serenity::CreateActionRow>,
    /// Optional plain-text content above the embeds
    pub content: Option<String>,
}

impl RenderedMessage {
    /// Builds a payload from a single embed.
    #[must_use]
    pub fn embed(embed: serenity::CreateEmbed) -> Self {
        Self {
            embeds: vec![embed],
            components: Vec::new(),
            content: None,
        }
    }

    /// Attaches interactive components to the payload.
    #[must_use]
    pub fn with_components(mut self, components: Vec<serenity::CreateActionRow>) -> Self {
        self.components = components;
        self
    }
}

/// A bot-visible message inside a client channel.
#[async_trait]
pub trait ClientMessage: Send + Sync {
    /// The message's Discord id
    fn id(&self) -> serenity::MessageId;

    /// Id of the user who authored the message
    fn author_id(&self) -> serenity::UserId;

    /// When the message was created
    fn created_at(&self) -> DateTime<Utc>;

    /// Whether the message currently carries at least one embed
    fn has_embeds(&self) -> bool;

    /// Replaces the message's content with `content`.
    async fn edit(&mut self, content: &RenderedMessage) -> Result<()>;

    /// Deletes the message.
    async fn delete(&self) -> Result<()>;
}

/// A channel capable of hosting the client UI.
#[async_trait]
pub trait ClientChannel: Send + Sync {
    /// The message handle type this channel produces
    type Message: ClientMessage;

    /// The channel's Discord id
    fn id(&self) -> serenity::ChannelId;

    /// The bot's own user id, used to gate edits to bot-authored messages
    fn bot_user_id(&self) -> serenity::UserId;

    /// Fetches a single message by id. Errors for deleted or inaccessible
    /// messages; the coordinator treats any failure as a stale reference.
    async fn fetch_message(&self, id: serenity::MessageId) -> Result<Self::Message>;

    /// Fetches up to `limit` of the most recent messages, newest first.
    async fn recent_messages(&self, limit: u8) -> Result<Vec<Self::Message>>;

    /// Sends a new message to the channel.
    async fn send(&self, content: &RenderedMessage) -> Result<Self::Message>;
}
