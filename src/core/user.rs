//! User business logic - lazy registration and lookups.
//!
//! Users are created the first time they interact with the shop; commands
//! and handlers call [`find_or_create_user`] instead of assuming a row exists.

use crate::{
    entities::{User, user},
    errors::Result,
};
use sea_orm::{Set, prelude::*};

/// Finds a user by Discord id, creating the row if it does not exist yet.
///
/// The stored username is not refreshed on later calls; it records what the
/// user was called when they first interacted with the shop.
pub async fn find_or_create_user(
    db: &DatabaseConnection,
    discord_id: &str,
    username: &str,
) -> Result<user::Model> {
    if let Some(existing) = User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let model = user::ActiveModel {
        discord_id: Set(discord_id.to_string()),
        username: Set(username.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds a user by Discord id, returning None if they never interacted with the shop.
pub async fn get_user_by_discord_id(
    db: &DatabaseConnection,
    discord_id: &str,
) -> Result<Option<user::Model>> {
    User::find()
        .filter(user::Column::DiscordId.eq(discord_id))
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;

        let first = find_or_create_user(&db, "123456", "alice").await?;
        let second = find_or_create_user(&db, "123456", "alice-renamed").await?;

        assert_eq!(first.id, second.id);
        // Username reflects first contact, not the latest call
        assert_eq!(second.username, "alice");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_by_discord_id_missing() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(get_user_by_discord_id(&db, "nobody").await?.is_none());
        Ok(())
    }
}
