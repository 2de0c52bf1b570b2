//! The client message lifecycle coordinator.
//!
//! One instance per process owns a map from channel id to the last known
//! bot-authored UI message in that channel. [`MessageCoordinator::upsert`]
//! edits the tracked message when it is still valid (bot-authored,
//! embed-bearing, recent) and otherwise falls back to cleaning up stale
//! bot messages and sending a fresh one. Entries expire after a maximum
//! age and are reclaimed by a periodic sweep so the map stays bounded over
//! the process lifetime.
//!
//! Concurrent upserts for the same channel are not serialized. Two racing
//! calls may both edit the same message (last writer wins) or produce a
//! short-lived duplicate that the next create-path cleanup removes.

use crate::errors::Result;
use crate::messaging::channel::{ClientChannel, ClientMessage, RenderedMessage};
use chrono::{DateTime, Duration, Utc};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// How many recent messages the create-path cleanup inspects
const CLEANUP_WINDOW: u8 = 10;

/// Tracking state for one channel's current UI message.
#[derive(Debug, Clone)]
pub struct ChannelMessageState {
    /// Id of the message the coordinator believes is the current UI
    pub message_id: serenity::MessageId,
    /// What the message currently shows (diagnostics only, e.g. `"cart_42"`)
    pub context: String,
    /// Last successful edit or creation; drives expiry
    pub last_touched_at: DateTime<Utc>,
}

/// Read-only snapshot of coordinator state for operational visibility.
#[derive(Debug, Clone)]
pub struct CoordinatorStats {
    /// Number of channels with a tracked message
    pub tracked_channels: usize,
    /// Count of tracked messages per context tag
    pub contexts: HashMap<String, usize>,
    /// Touch timestamp of the least recently updated entry
    pub oldest_touch: Option<DateTime<Utc>>,
    /// Touch timestamp of the most recently updated entry
    pub newest_touch: Option<DateTime<Utc>>,
}

/// Decides, per channel, whether a UI update edits the tracked message or
/// creates a new one. See the module docs for the full decision procedure.
pub struct MessageCoordinator {
    states: RwLock<HashMap<serenity::ChannelId, ChannelMessageState>>,
    max_message_age: Duration,
}

impl Default for MessageCoordinator {
    fn default() -> Self {
        Self::new(Duration::minutes(60))
    }
}

impl MessageCoordinator {
    /// Creates a coordinator whose tracked messages go stale after
    /// `max_message_age`. The same threshold gates both cache-entry expiry
    /// and the age validation of fetched messages.
    #[must_use]
    pub fn new(max_message_age: Duration) -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
            max_message_age,
        }
    }

    /// Sends or updates the UI message for a channel.
    ///
    /// The happy path edits the tracked message in place. The coordinator
    /// falls back to creating a new message when there is no usable entry:
    /// none tracked, entry expired, tracked message unfetchable, authored
    /// by someone else, embed-less, or older than the maximum age. All of
    /// those fallbacks are silent; only a failure of the terminal send or
    /// edit itself is returned to the caller.
    ///
    /// # Errors
    /// Returns an error when the final send or edit fails (channel gone,
    /// permissions revoked). In that case no UI was updated.
    pub async fn upsert<C: ClientChannel>(
        &self,
        channel: &C,
        content: &RenderedMessage,
        context: &str,
        force_new: bool,
    ) -> Result<C::Message> {
        let channel_id = channel.id();
        debug!(%channel_id, context, force_new, "Processing client message upsert");

        if force_new {
            return self.create_new(channel, content, context).await;
        }

        match self.try_edit_existing(channel, content, context).await? {
            Some(edited) => Ok(edited),
            None => self.create_new(channel, content, context).await,
        }
    }

    /// Always creates a new message, replacing whatever was tracked.
    ///
    /// Used when domain semantics require a genuinely new message, like a
    /// checkout confirmation that must not overwrite a screen the user may
    /// still be reading.
    ///
    /// # Errors
    /// Returns an error when the send fails.
    pub async fn force_new<C: ClientChannel>(
        &self,
        channel: &C,
        content: &RenderedMessage,
        context: &str,
    ) -> Result<C::Message> {
        self.upsert(channel, content, context, true).await
    }

    /// Attempts the edit path. Returns `Ok(None)` when the caller should
    /// fall back to creating a new message; only a failed edit of a
    /// validated message is an error.
    async fn try_edit_existing<C: ClientChannel>(
        &self,
        channel: &C,
        content: &RenderedMessage,
        context: &str,
    ) -> Result<Option<C::Message>> {
        let channel_id = channel.id();

        let Some(entry) = self.states.read().await.get(&channel_id).cloned() else {
            debug!(%channel_id, "No tracked message for channel");
            return Ok(None);
        };

        // An expired entry must not drive an edit even if the sweep has
        // not reclaimed it yet
        let now = Utc::now();
        if now - entry.last_touched_at > self.max_message_age {
            debug!(%channel_id, message_id = %entry.message_id, "Tracked entry expired");
            self.invalidate(channel_id).await;
            return Ok(None);
        }

        let mut message = match channel.fetch_message(entry.message_id).await {
            Ok(message) => message,
            Err(error) => {
                debug!(
                    %channel_id,
                    message_id = %entry.message_id,
                    %error,
                    "Could not fetch tracked message"
                );
                self.invalidate(channel_id).await;
                return Ok(None);
            }
        };

        if !self.is_valid_for_edit(&message, channel.bot_user_id(), now) {
            debug!(
                %channel_id,
                message_id = %entry.message_id,
                "Tracked message is not valid for editing"
            );
            self.invalidate(channel_id).await;
            return Ok(None);
        }

        // Terminal edit failure propagates - there is no further fallback
        message.edit(content).await?;
        self.track(channel_id, message.id(), context).await;

        debug!(%channel_id, message_id = %message.id(), context, "Edited tracked message");
        Ok(Some(message))
    }

    /// Create-path: clean up stale bot messages, send the replacement, and
    /// track it.
    async fn create_new<C: ClientChannel>(
        &self,
        channel: &C,
        content: &RenderedMessage,
        context: &str,
    ) -> Result<C::Message> {
        let channel_id = channel.id();

        self.cleanup_stale_messages(channel).await;

        let message = channel.send(content).await?;
        self.track(channel_id, message.id(), context).await;

        info!(%channel_id, message_id = %message.id(), context, "Created new client message");
        Ok(message)
    }

    /// Deletes bot-authored, embed-bearing messages in the recent window.
    ///
    /// Invoked only right before a replacement is sent, so every existing
    /// UI message ranks as an older duplicate of the incoming one. Fetch
    /// and delete failures are logged and swallowed; cleanup never affects
    /// the outcome of the upsert itself.
    async fn cleanup_stale_messages<C: ClientChannel>(&self, channel: &C) {
        let channel_id = channel.id();

        let recent = match channel.recent_messages(CLEANUP_WINDOW).await {
            Ok(recent) => recent,
            Err(error) => {
                warn!(%channel_id, %error, "Could not list recent messages for cleanup");
                return;
            }
        };

        let bot_user_id = channel.bot_user_id();
        let mut stale: Vec<&C::Message> = recent
            .iter()
            .filter(|m| m.author_id() == bot_user_id && m.has_embeds())
            .collect();
        // Oldest first, so partial failures leave the least stale survivors
        stale.sort_by_key(|m| m.created_at());

        for message in stale {
            match message.delete().await {
                Ok(()) => {
                    debug!(%channel_id, message_id = %message.id(), "Deleted stale client message");
                }
                Err(error) => {
                    warn!(
                        %channel_id,
                        message_id = %message.id(),
                        %error,
                        "Could not delete stale client message"
                    );
                }
            }
        }
    }

    /// Validation gate for the edit path: only recent, embed-bearing
    /// messages authored by the bot itself represent the current UI.
    fn is_valid_for_edit<M: ClientMessage>(
        &self,
        message: &M,
        bot_user_id: serenity::UserId,
        now: DateTime<Utc>,
    ) -> bool {
        if message.author_id() != bot_user_id {
            return false;
        }
        if !message.has_embeds() {
            return false;
        }
        now - message.created_at() <= self.max_message_age
    }

    /// Records `message_id` as the channel's current UI message.
    async fn track(&self, channel_id: serenity::ChannelId, message_id: serenity::MessageId, context: &str) {
        let mut states = self.states.write().await;
        states.insert(
            channel_id,
            ChannelMessageState {
                message_id,
                context: context.to_string(),
                last_touched_at: Utc::now(),
            },
        );
    }

    /// Drops the tracked entry for a channel, if any.
    ///
    /// The next upsert for the channel will take the create path.
    pub async fn invalidate(&self, channel_id: serenity::ChannelId) {
        if self.states.write().await.remove(&channel_id).is_some() {
            debug!(%channel_id, "Removed tracked message for channel");
        }
    }

    /// Removes entries whose last touch is older than the maximum age.
    ///
    /// Purely a memory-bound housekeeping measure - no Discord-side action
    /// is taken. Returns how many entries were reclaimed.
    pub async fn sweep(&self) -> usize {
        let cutoff = Utc::now() - self.max_message_age;
        let mut states = self.states.write().await;
        let before = states.len();
        states.retain(|_, entry| entry.last_touched_at >= cutoff);
        let swept = before - states.len();

        if swept > 0 {
            info!(swept, remaining = states.len(), "Swept expired message cache entries");
        }
        swept
    }

    /// Spawns a background task that runs [`Self::sweep`] on a fixed
    /// interval for the lifetime of the process.
    pub fn spawn_sweeper(self: &Arc<Self>, period: std::time::Duration) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        info!(period_secs = period.as_secs(), "Starting message cache sweeper");

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately; skip it so the sweep
            // cadence starts one full period after startup
            interval.tick().await;
            loop {
                interval.tick().await;
                coordinator.sweep().await;
            }
        })
    }

    /// Snapshot of the coordinator's current tracking state.
    pub async fn stats(&self) -> CoordinatorStats {
        let states = self.states.read().await;

        let mut contexts: HashMap<String, usize> = HashMap::new();
        for entry in states.values() {
            *contexts.entry(entry.context.clone()).or_insert(0) += 1;
        }

        CoordinatorStats {
            tracked_channels: states.len(),
            contexts,
            oldest_touch: states.values().map(|e| e.last_touched_at).min(),
            newest_touch: states.values().map(|e| e.last_touched_at).max(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{MockChannel, cart_screen, checkout_screen};

    fn coordinator() -> MessageCoordinator {
        MessageCoordinator::new(Duration::minutes(60))
    }

    #[tokio::test]
    async fn test_first_upsert_creates_then_edits_in_place() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        let first = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await?;
        let second = coordinator
            .upsert(&channel, &cart_screen("v2"), "cart_1", false)
            .await?;

        // Same message edited in place, not a second one created
        assert_eq!(first.id(), second.id());
        assert_eq!(channel.message_count(), 1);
        assert_eq!(channel.edit_count(first.id()).unwrap(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_embedless_tracked_message_is_not_edited() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        let first = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await?;
        channel.strip_embeds(first.id());

        let second = coordinator
            .upsert(&channel, &cart_screen("v2"), "cart_1", false)
            .await?;

        // A text-only message is never treated as the current UI
        assert_ne!(first.id(), second.id());
        assert_eq!(channel.edit_count(first.id()).unwrap(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_authored_message_is_not_edited() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        // Simulate a tracked entry pointing at another author's message
        let foreign_id = channel.insert_foreign_message(42);
        coordinator.track(channel.id(), foreign_id, "cart_1").await;

        let created = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await?;

        // The foreign message survives untouched; a new one is created
        assert_ne!(created.id(), foreign_id);
        assert_eq!(channel.edit_count(foreign_id).unwrap(), 0);
        assert!(channel.contains(foreign_id));
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_cache_entry_is_not_reused() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        let first = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await?;

        // Backdate the entry past the max age while leaving it map-resident
        {
            let mut states = coordinator.states.write().await;
            let entry = states.get_mut(&channel.id()).unwrap();
            entry.last_touched_at -= Duration::hours(2);
        }

        let second = coordinator
            .upsert(&channel, &cart_screen("v2"), "cart_1", false)
            .await?;

        // A new message is created even though the entry was still present
        assert_ne!(first.id(), second.id());
        assert_eq!(channel.edit_count(first.id()).unwrap(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_old_message_fails_age_validation() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        let first = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await?;
        // Entry stays fresh; only the message itself is old
        channel.backdate_message(first.id(), Duration::hours(2));

        let second = coordinator
            .upsert(&channel, &cart_screen("v2"), "cart_1", false)
            .await?;

        assert_ne!(first.id(), second.id());
        Ok(())
    }

    #[tokio::test]
    async fn test_force_new_bypasses_valid_entry() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        let first = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await?;
        let second = coordinator
            .force_new(&channel, &checkout_screen("order"), "checkout_1")
            .await?;

        // A fresh, editable entry is ignored when a new message is forced
        assert_ne!(first.id(), second.id());

        let states = coordinator.states.read().await;
        let entry = states.get(&channel.id()).unwrap();
        assert_eq!(entry.message_id, second.id());
        assert_eq!(entry.context, "checkout_1");
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_creates_leave_single_ui_message() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        for i in 0..3 {
            coordinator
                .force_new(&channel, &cart_screen(&format!("v{i}")), "cart_1")
                .await?;
        }

        // Older duplicates are removed by the create-path cleanup
        assert_eq!(channel.bot_embed_count_in_recent(10), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_cleanup_spares_foreign_and_embedless_messages() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        let foreign_id = channel.insert_foreign_message(42);
        let plain_id = channel.insert_bot_text_message();

        coordinator
            .force_new(&channel, &cart_screen("v1"), "cart_1")
            .await?;
        coordinator
            .force_new(&channel, &cart_screen("v2"), "cart_1")
            .await?;

        assert!(channel.contains(foreign_id));
        assert!(channel.contains(plain_id));
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_failure_falls_back_to_create() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        let first = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await?;

        channel.set_fail_fetch(true);
        let second = coordinator
            .upsert(&channel, &cart_screen("v2"), "cart_1", false)
            .await?;
        channel.set_fail_fetch(false);

        // Stale-reference errors never surface; the entry was invalidated
        // and replaced by the newly created message
        assert_ne!(first.id(), second.id());
        let states = coordinator.states.read().await;
        assert_eq!(states.get(&channel.id()).unwrap().message_id, second.id());
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_send_failure_propagates() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        channel.set_fail_next_send();
        let result = coordinator
            .upsert(&channel, &cart_screen("v1"), "cart_1", false)
            .await;
        assert!(result.is_err());

        // No entry is tracked after a failed send
        assert!(coordinator.states.read().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_sweep_reclaims_only_expired_entries() -> Result<()> {
        let coordinator = coordinator();
        let fresh = MockChannel::new(1, 99);
        let stale = MockChannel::new(2, 99);

        coordinator
            .upsert(&fresh, &cart_screen("v1"), "cart_1", false)
            .await?;
        coordinator
            .upsert(&stale, &cart_screen("v1"), "cart_2", false)
            .await?;

        {
            let mut states = coordinator.states.write().await;
            states.get_mut(&stale.id()).unwrap().last_touched_at -= Duration::hours(2);
        }

        assert_eq!(coordinator.sweep().await, 1);

        let states = coordinator.states.read().await;
        assert!(states.contains_key(&fresh.id()));
        assert!(!states.contains_key(&stale.id()));
        Ok(())
    }

    #[tokio::test]
    async fn test_stats_reports_context_breakdown() -> Result<()> {
        let coordinator = coordinator();
        let first = MockChannel::new(1, 99);
        let second = MockChannel::new(2, 99);
        let third = MockChannel::new(3, 99);

        coordinator
            .upsert(&first, &cart_screen("v1"), "cart_1", false)
            .await?;
        coordinator
            .upsert(&second, &cart_screen("v1"), "cart_2", false)
            .await?;
        coordinator
            .upsert(&third, &checkout_screen("order"), "checkout_3", false)
            .await?;

        let stats = coordinator.stats().await;
        assert_eq!(stats.tracked_channels, 3);
        assert_eq!(stats.contexts.get("cart_1"), Some(&1));
        assert_eq!(stats.contexts.get("checkout_3"), Some(&1));
        assert!(stats.oldest_touch.unwrap() <= stats.newest_touch.unwrap());
        Ok(())
    }

    #[tokio::test]
    async fn test_cart_to_checkout_scenario() -> Result<()> {
        let coordinator = coordinator();
        let channel = MockChannel::new(1, 99);

        // Cart screen created, then updated in place
        let m1 = coordinator
            .upsert(&channel, &cart_screen("cart v1"), "cart_1", false)
            .await?;
        let edited = coordinator
            .upsert(&channel, &cart_screen("cart v2"), "cart_1", false)
            .await?;
        assert_eq!(m1.id(), edited.id());
        assert_eq!(channel.message_count(), 1);

        // Checkout must be a genuinely new message
        let m2 = coordinator
            .upsert(&channel, &checkout_screen("checkout"), "checkout_1", true)
            .await?;
        assert_ne!(m1.id(), m2.id());

        let states = coordinator.states.read().await;
        let entry = states.get(&channel.id()).unwrap();
        assert_eq!(entry.message_id, m2.id());
        assert_eq!(entry.context, "checkout_1");
        Ok(())
    }
}
