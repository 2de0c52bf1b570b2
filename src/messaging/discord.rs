//! Serenity-backed implementations of the channel abstractions.
//!
//! [`DiscordChannel`] wraps a channel id plus an HTTP handle and exposes it
//! through [`ClientChannel`], so the coordinator can drive real ticket
//! channels through the same interface the tests fake.

use crate::errors::Result;
use crate::messaging::channel::{ClientChannel, ClientMessage, RenderedMessage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

impl RenderedMessage {
    fn to_create_message(&self) -> serenity::CreateMessage {
        let mut builder = serenity::CreateMessage::new()
            .embeds(self.embeds.clone())
            .components(self.components.clone());
        if let Some(content) = &self.content {
            builder = builder.content(content.clone());
        }
        builder
    }

    fn to_edit_message(&self) -> serenity::EditMessage {
        let mut builder = serenity::EditMessage::new()
            .embeds(self.embeds.clone())
            .components(self.components.clone());
        if let Some(content) = &self.content {
            builder = builder.content(content.clone());
        }
        builder
    }
}

/// A live ticket channel the coordinator can manage messages in.
pub struct DiscordChannel {
    http: Arc<serenity::Http>,
    channel_id: serenity::ChannelId,
    bot_user_id: serenity::UserId,
}

impl DiscordChannel {
    /// Wraps a channel for the coordinator.
    ///
    /// `bot_user_id` is the bot's own user id (from the gateway ready
    /// event); it gates which messages are ever edited or cleaned up.
    #[must_use]
    pub fn new(
        http: Arc<serenity::Http>,
        channel_id: serenity::ChannelId,
        bot_user_id: serenity::UserId,
    ) -> Self {
        Self {
            http,
            channel_id,
            bot_user_id,
        }
    }
}

/// A fetched Discord message plus the HTTP handle needed to mutate it.
pub struct DiscordMessage {
    http: Arc<serenity::Http>,
    message: serenity::Message,
}

#[async_trait]
impl ClientMessage for DiscordMessage {
    fn id(&self) -> serenity::MessageId {
        self.message.id
    }

    fn author_id(&self) -> serenity::UserId {
        self.message.author.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        // Snowflake timestamps are valid well past 2038; epoch fallback
        // simply fails the age validation
        DateTime::from_timestamp(self.message.timestamp.unix_timestamp(), 0).unwrap_or_default()
    }

    fn has_embeds(&self) -> bool {
        !self.message.embeds.is_empty()
    }

    async fn edit(&mut self, content: &RenderedMessage) -> Result<()> {
        self.message
            .edit(&self.http, content.to_edit_message())
            .await?;
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.message.delete(&self.http).await?;
        Ok(())
    }
}

#[async_trait]
impl ClientChannel for DiscordChannel {
    type Message = DiscordMessage;

    fn id(&self) -> serenity::ChannelId {
        self.channel_id
    }

    fn bot_user_id(&self) -> serenity::UserId {
        self.bot_user_id
    }

    async fn fetch_message(&self, id: serenity::MessageId) -> Result<Self::Message> {
        let message = self.channel_id.message(&self.http, id).await?;
        Ok(DiscordMessage {
            http: Arc::clone(&self.http),
            message,
        })
    }

    async fn recent_messages(&self, limit: u8) -> Result<Vec<Self::Message>> {
        let messages = self
            .channel_id
            .messages(&self.http, serenity::GetMessages::new().limit(limit))
            .await?;

        Ok(messages
            .into_iter()
            .map(|message| DiscordMessage {
                http: Arc::clone(&self.http),
                message,
            })
            .collect())
    }

    async fn send(&self, content: &RenderedMessage) -> Result<Self::Message> {
        let message = self
            .channel_id
            .send_message(&self.http, content.to_create_message())
            .await?;

        Ok(DiscordMessage {
            http: Arc::clone(&self.http),
            message,
        })
    }
}
