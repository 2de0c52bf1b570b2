//! Shared test utilities for `ShopBuddy`.
//!
//! This module provides helper functions for setting up test databases and
//! creating test entities with sensible defaults, plus an in-memory fake of
//! the client channel abstraction for exercising the message coordinator
//! without Discord.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{account, catalog, user},
    entities::{self, friendship},
    errors::{Error, Result},
    messaging::{ClientChannel, ClientMessage, RenderedMessage},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use poise::serenity_prelude as serenity;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use std::sync::{Arc, Mutex};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates (or returns) a test user with the given Discord id.
pub async fn create_test_user(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<entities::user::Model> {
    user::find_or_create_user(db, discord_id, "test-user").await
}

/// Creates a test gifting account with sensible defaults.
///
/// # Defaults
/// * `rp_balance`: 10000
/// * `max_friends`: 250
/// * `region`: "BR"
pub async fn create_test_account(
    db: &DatabaseConnection,
    nickname: &str,
) -> Result<entities::account::Model> {
    account::create_account(db, nickname.to_string(), 10_000, 250, "BR".to_string()).await
}

/// Creates a test catalog item with no image.
pub async fn create_test_catalog_item(
    db: &DatabaseConnection,
    name: &str,
    category: &str,
    price_rp: i64,
) -> Result<entities::catalog_item::Model> {
    catalog::create_item(db, name.to_string(), category.to_string(), price_rp, None).await
}

/// Inserts an already-approved friendship whose approval lies `days_ago`
/// days in the past, for exercising the gift-eligibility clock.
pub async fn create_approved_friendship(
    db: &DatabaseConnection,
    user_id: i64,
    account_id: i64,
    days_ago: i64,
) -> Result<entities::friendship::Model> {
    let approved_at = Utc::now() - Duration::days(days_ago);
    let model = friendship::ActiveModel {
        user_id: Set(user_id),
        account_id: Set(account_id),
        game_nickname: Set("TestPlayer".to_string()),
        game_tag: Set("BR1".to_string()),
        status: Set(friendship::status::APPROVED.to_string()),
        created_at: Set(approved_at),
        approved_at: Set(Some(approved_at)),
        ..Default::default()
    };
    Ok(model.insert(db).await?)
}

/// A simple embed payload standing in for the cart screen.
#[must_use]
pub fn cart_screen(body: &str) -> RenderedMessage {
    RenderedMessage::embed(serenity::CreateEmbed::new().title("Cart").description(body))
}

/// A simple embed payload standing in for the checkout screen.
#[must_use]
pub fn checkout_screen(body: &str) -> RenderedMessage {
    RenderedMessage::embed(
        serenity::CreateEmbed::new()
            .title("Checkout")
            .description(body),
    )
}

#[derive(Clone)]
struct MockRecord {
    id: serenity::MessageId,
    author_id: serenity::UserId,
    created_at: DateTime<Utc>,
    embed_count: usize,
    edit_count: u32,
}

struct MockStore {
    next_id: u64,
    records: Vec<MockRecord>,
    fail_fetch: bool,
    fail_next_send: bool,
}

/// In-memory stand-in for a ticket channel.
///
/// Messages live in a shared store so handles returned by `fetch_message`
/// observe edits and deletions made through other handles, mimicking how
/// Discord state behaves behind the real adapter.
pub struct MockChannel {
    channel_id: serenity::ChannelId,
    bot_user_id: serenity::UserId,
    store: Arc<Mutex<MockStore>>,
}

impl MockChannel {
    /// Creates an empty channel with the given channel and bot user ids.
    #[must_use]
    pub fn new(channel_id: u64, bot_user_id: u64) -> Self {
        Self {
            channel_id: serenity::ChannelId::new(channel_id),
            bot_user_id: serenity::UserId::new(bot_user_id),
            store: Arc::new(Mutex::new(MockStore {
                next_id: 1,
                records: Vec::new(),
                fail_fetch: false,
                fail_next_send: false,
            })),
        }
    }

    /// Total messages currently in the channel.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.store.lock().unwrap().records.len()
    }

    /// Whether a message still exists in the channel.
    #[must_use]
    pub fn contains(&self, id: serenity::MessageId) -> bool {
        self.store
            .lock()
            .unwrap()
            .records
            .iter()
            .any(|r| r.id == id)
    }

    /// How many times a message has been edited, or None if deleted.
    #[must_use]
    pub fn edit_count(&self, id: serenity::MessageId) -> Option<u32> {
        self.store
            .lock()
            .unwrap()
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.edit_count)
    }

    /// Bot-authored, embed-bearing messages among the most recent `limit`.
    #[must_use]
    pub fn bot_embed_count_in_recent(&self, limit: usize) -> usize {
        let store = self.store.lock().unwrap();
        store
            .records
            .iter()
            .rev()
            .take(limit)
            .filter(|r| r.author_id == self.bot_user_id && r.embed_count > 0)
            .count()
    }

    /// Removes all embeds from a message, making it text-only.
    pub fn strip_embeds(&self, id: serenity::MessageId) {
        let mut store = self.store.lock().unwrap();
        if let Some(record) = store.records.iter_mut().find(|r| r.id == id) {
            record.embed_count = 0;
        }
    }

    /// Moves a message's creation time into the past.
    pub fn backdate_message(&self, id: serenity::MessageId, by: Duration) {
        let mut store = self.store.lock().unwrap();
        if let Some(record) = store.records.iter_mut().find(|r| r.id == id) {
            record.created_at -= by;
        }
    }

    /// Inserts an embed-bearing message authored by someone else.
    pub fn insert_foreign_message(&self, author_id: u64) -> serenity::MessageId {
        self.insert_record(serenity::UserId::new(author_id), 1)
    }

    /// Inserts a bot-authored message with no embeds.
    pub fn insert_bot_text_message(&self) -> serenity::MessageId {
        self.insert_record(self.bot_user_id, 0)
    }

    /// Makes every subsequent fetch fail until reset.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.store.lock().unwrap().fail_fetch = fail;
    }

    /// Makes the next send fail, then resets.
    pub fn set_fail_next_send(&self) {
        self.store.lock().unwrap().fail_next_send = true;
    }

    fn insert_record(&self, author_id: serenity::UserId, embed_count: usize) -> serenity::MessageId {
        let mut store = self.store.lock().unwrap();
        let id = serenity::MessageId::new(store.next_id);
        store.next_id += 1;
        store.records.push(MockRecord {
            id,
            author_id,
            created_at: Utc::now(),
            embed_count,
            edit_count: 0,
        });
        id
    }
}

/// Handle to a message in a [`MockChannel`].
pub struct MockMessage {
    record: MockRecord,
    store: Arc<Mutex<MockStore>>,
}

#[async_trait]
impl ClientMessage for MockMessage {
    fn id(&self) -> serenity::MessageId {
        self.record.id
    }

    fn author_id(&self) -> serenity::UserId {
        self.record.author_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at
    }

    fn has_embeds(&self) -> bool {
        self.record.embed_count > 0
    }

    async fn edit(&mut self, content: &RenderedMessage) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        let record = store
            .records
            .iter_mut()
            .find(|r| r.id == self.record.id)
            .ok_or_else(|| Error::Config {
                message: "mock message was deleted".to_string(),
            })?;

        record.embed_count = content.embeds.len();
        record.edit_count += 1;
        self.record = record.clone();
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        let before = store.records.len();
        store.records.retain(|r| r.id != self.record.id);
        if store.records.len() == before {
            return Err(Error::Config {
                message: "mock message already deleted".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ClientChannel for MockChannel {
    type Message = MockMessage;

    fn id(&self) -> serenity::ChannelId {
        self.channel_id
    }

    fn bot_user_id(&self) -> serenity::UserId {
        self.bot_user_id
    }

    async fn fetch_message(&self, id: serenity::MessageId) -> Result<Self::Message> {
        let store = self.store.lock().unwrap();
        if store.fail_fetch {
            return Err(Error::Config {
                message: "mock fetch failure".to_string(),
            });
        }

        store
            .records
            .iter()
            .find(|r| r.id == id)
            .map(|record| MockMessage {
                record: record.clone(),
                store: Arc::clone(&self.store),
            })
            .ok_or_else(|| Error::Config {
                message: format!("mock message {id} not found"),
            })
    }

    async fn recent_messages(&self, limit: u8) -> Result<Vec<Self::Message>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .records
            .iter()
            .rev()
            .take(limit as usize)
            .map(|record| MockMessage {
                record: record.clone(),
                store: Arc::clone(&self.store),
            })
            .collect())
    }

    async fn send(&self, content: &RenderedMessage) -> Result<Self::Message> {
        {
            let mut store = self.store.lock().unwrap();
            if store.fail_next_send {
                store.fail_next_send = false;
                return Err(Error::Config {
                    message: "mock send failure".to_string(),
                });
            }
        }

        let id = self.insert_record(self.bot_user_id, content.embeds.len());
        let store = self.store.lock().unwrap();
        let record = store
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::Config {
                message: "mock store lost a just-sent message".to_string(),
            })?;

        Ok(MockMessage {
            record,
            store: Arc::clone(&self.store),
        })
    }
}
