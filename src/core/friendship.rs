//! Friendship business logic - requests, approval, and gift eligibility.
//!
//! A friendship links a customer to a gifting account. Requests are
//! reviewed by admins; once approved, the in-game friendship must age past
//! a configured minimum number of days before the account may send gifts.

use crate::{
    entities::{Friendship, friendship},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// A friendship annotated with its gift-eligibility state, used by checkout.
#[derive(Debug, Clone)]
pub struct EligibilityStatus {
    /// The friendship being evaluated
    pub friendship: friendship::Model,
    /// Days elapsed since approval (0 when pending or rejected)
    pub days_since_approval: i64,
    /// Days left before gifts may be sent (0 when already eligible)
    pub days_remaining: i64,
    /// Whether this friendship can receive gifts now
    pub eligible: bool,
}

/// Creates a pending friendship request from a user to a gifting account.
///
/// Rejects the request when any friendship (pending or approved) already
/// exists for the same user/account pair.
pub async fn request_friendship(
    db: &DatabaseConnection,
    user_id: i64,
    account_id: i64,
    account_nickname: &str,
    game_nickname: String,
    game_tag: String,
) -> Result<friendship::Model> {
    let existing = Friendship::find()
        .filter(friendship::Column::UserId.eq(user_id))
        .filter(friendship::Column::AccountId.eq(account_id))
        .filter(friendship::Column::Status.ne(friendship::status::REJECTED))
        .one(db)
        .await?;

    if existing.is_some() {
        return Err(Error::DuplicateFriendship {
            account: account_nickname.to_string(),
        });
    }

    let model = friendship::ActiveModel {
        user_id: Set(user_id),
        account_id: Set(account_id),
        game_nickname: Set(game_nickname),
        game_tag: Set(game_tag),
        status: Set(friendship::status::PENDING.to_string()),
        created_at: Set(chrono::Utc::now()),
        approved_at: Set(None),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds a friendship by its unique id.
pub async fn get_friendship_by_id(
    db: &DatabaseConnection,
    friendship_id: i64,
) -> Result<Option<friendship::Model>> {
    Friendship::find_by_id(friendship_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Approves a pending friendship request, starting the eligibility clock.
pub async fn approve_friendship(
    db: &DatabaseConnection,
    friendship_id: i64,
) -> Result<friendship::Model> {
    let friendship = Friendship::find_by_id(friendship_id)
        .one(db)
        .await?
        .ok_or(Error::FriendshipNotFound { id: friendship_id })?;

    let mut model: friendship::ActiveModel = friendship.into();
    model.status = Set(friendship::status::APPROVED.to_string());
    model.approved_at = Set(Some(chrono::Utc::now()));

    Ok(model.update(db).await?)
}

/// Rejects a pending friendship request.
pub async fn reject_friendship(
    db: &DatabaseConnection,
    friendship_id: i64,
) -> Result<friendship::Model> {
    let friendship = Friendship::find_by_id(friendship_id)
        .one(db)
        .await?
        .ok_or(Error::FriendshipNotFound { id: friendship_id })?;

    let mut model: friendship::ActiveModel = friendship.into();
    model.status = Set(friendship::status::REJECTED.to_string());
    model.approved_at = Set(None);

    Ok(model.update(db).await?)
}

/// Lists a user's friendships, newest first.
pub async fn get_friendships_for_user(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Vec<friendship::Model>> {
    Friendship::find()
        .filter(friendship::Column::UserId.eq(user_id))
        .order_by_desc(friendship::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Evaluates gift eligibility for every approved friendship a user has.
///
/// Returns one [`EligibilityStatus`] per approved friendship; checkout
/// partitions these into selectable and wait-listed delivery targets.
pub async fn eligibility_for_user(
    db: &DatabaseConnection,
    user_id: i64,
    min_friendship_days: i64,
) -> Result<Vec<EligibilityStatus>> {
    let now = chrono::Utc::now();
    let friendships = Friendship::find()
        .filter(friendship::Column::UserId.eq(user_id))
        .filter(friendship::Column::Status.eq(friendship::status::APPROVED))
        .order_by_asc(friendship::Column::ApprovedAt)
        .all(db)
        .await?;

    Ok(friendships
        .into_iter()
        .map(|f| evaluate_eligibility(f, min_friendship_days, now))
        .collect())
}

/// Computes the eligibility state of a single friendship at `now`.
#[must_use]
pub fn evaluate_eligibility(
    friendship: friendship::Model,
    min_friendship_days: i64,
    now: DateTime<Utc>,
) -> EligibilityStatus {
    let days_since_approval = friendship
        .approved_at
        .map_or(0, |approved| (now - approved).num_days());
    let days_remaining = (min_friendship_days - days_since_approval).max(0);
    let eligible =
        friendship.status == friendship::status::APPROVED && days_remaining == 0;

    EligibilityStatus {
        friendship,
        days_since_approval,
        days_remaining,
        eligible,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_approved_friendship, create_test_account, create_test_user, setup_test_db,
    };

    #[tokio::test]
    async fn test_request_rejects_duplicates() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let account = create_test_account(&db, "Gifter").await?;

        request_friendship(
            &db,
            user.id,
            account.id,
            &account.nickname,
            "Player".to_string(),
            "BR1".to_string(),
        )
        .await?;

        let result = request_friendship(
            &db,
            user.id,
            account.id,
            &account.nickname,
            "Player".to_string(),
            "BR1".to_string(),
        )
        .await;
        assert!(matches!(result, Err(Error::DuplicateFriendship { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_request_can_be_retried() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let account = create_test_account(&db, "Gifter").await?;

        let first = request_friendship(
            &db,
            user.id,
            account.id,
            &account.nickname,
            "Player".to_string(),
            "BR1".to_string(),
        )
        .await?;
        reject_friendship(&db, first.id).await?;

        // A rejected request no longer blocks a fresh one
        let retry = request_friendship(
            &db,
            user.id,
            account.id,
            &account.nickname,
            "Player".to_string(),
            "BR1".to_string(),
        )
        .await?;
        assert_ne!(retry.id, first.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_approval_starts_eligibility_clock() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let account = create_test_account(&db, "Gifter").await?;

        let friendship = request_friendship(
            &db,
            user.id,
            account.id,
            &account.nickname,
            "Player".to_string(),
            "BR1".to_string(),
        )
        .await?;

        // Pending requests are invisible to eligibility
        assert!(eligibility_for_user(&db, user.id, 7).await?.is_empty());

        let approved = approve_friendship(&db, friendship.id).await?;
        assert!(approved.approved_at.is_some());

        let statuses = eligibility_for_user(&db, user.id, 7).await?;
        assert_eq!(statuses.len(), 1);
        assert!(!statuses[0].eligible);
        assert_eq!(statuses[0].days_remaining, 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_aged_friendship_becomes_eligible() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "111").await?;
        let account = create_test_account(&db, "Gifter").await?;
        create_approved_friendship(&db, user.id, account.id, 10).await?;

        let statuses = eligibility_for_user(&db, user.id, 7).await?;
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].eligible);
        assert_eq!(statuses[0].days_since_approval, 10);
        assert_eq!(statuses[0].days_remaining, 0);
        Ok(())
    }
}
