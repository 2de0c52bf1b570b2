//! Gifting account business logic.
//!
//! Accounts are the shop-owned game accounts that deliver gifts. Customers
//! link to them through friendships; delivery capacity is bounded by the
//! in-game friend-list cap and the account's RP balance.

use crate::{
    entities::{Account, account},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Registers a new gifting account.
///
/// Validates that the nickname is not empty and that the RP balance and
/// friend capacity are non-negative.
pub async fn create_account(
    db: &DatabaseConnection,
    nickname: String,
    rp_balance: i64,
    max_friends: i32,
    region: String,
) -> Result<account::Model> {
    if nickname.trim().is_empty() {
        return Err(Error::Config {
            message: "Account nickname cannot be empty".to_string(),
        });
    }

    #[allow(clippy::cast_precision_loss)] // RP amounts are far below 2^52
    if rp_balance < 0 {
        return Err(Error::InvalidAmount {
            amount: rp_balance as f64,
        });
    }

    if max_friends <= 0 {
        return Err(Error::InvalidAmount {
            amount: f64::from(max_friends),
        });
    }

    let model = account::ActiveModel {
        nickname: Set(nickname.trim().to_string()),
        rp_balance: Set(rp_balance),
        friends_count: Set(0),
        max_friends: Set(max_friends),
        region: Set(region),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}

/// Finds an account by its unique id.
pub async fn get_account_by_id(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<Option<account::Model>> {
    Account::find_by_id(account_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all registered accounts, newest first.
pub async fn get_all_accounts(db: &DatabaseConnection) -> Result<Vec<account::Model>> {
    Account::find()
        .order_by_desc(account::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves accounts that still have free friend slots, least-loaded first.
///
/// When `region` is given, only accounts in that region are considered.
/// Used to offer customers an account they can still be added to.
pub async fn get_available_accounts(
    db: &DatabaseConnection,
    region: Option<&str>,
) -> Result<Vec<account::Model>> {
    use sea_orm::sea_query::Expr;

    let mut query = Account::find()
        .filter(Expr::col(account::Column::FriendsCount).lt(Expr::col(account::Column::MaxFriends)))
        .order_by_asc(account::Column::FriendsCount);

    if let Some(region) = region {
        query = query.filter(account::Column::Region.eq(region));
    }

    query.all(db).await.map_err(Into::into)
}

/// Atomically adjusts an account's RP balance by a delta.
///
/// Uses a single `UPDATE accounts SET rp_balance = rp_balance + delta`
/// statement so concurrent order approvals cannot lose updates. Fails if
/// the deduction would leave the balance negative.
pub async fn adjust_rp_balance(
    db: &DatabaseConnection,
    account_id: i64,
    delta: i64,
) -> Result<account::Model> {
    use sea_orm::sea_query::Expr;

    let account = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })?;

    #[allow(clippy::cast_precision_loss)] // RP amounts are far below 2^52
    if account.rp_balance + delta < 0 {
        return Err(Error::InvalidAmount {
            amount: delta as f64,
        });
    }

    Account::update_many()
        .col_expr(
            account::Column::RpBalance,
            Expr::col(account::Column::RpBalance).add(delta),
        )
        .filter(account::Column::Id.eq(account_id))
        .exec(db)
        .await?;

    Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })
}

/// Atomically increments an account's friend counter.
///
/// Called when a friendship request against the account is approved.
pub async fn increment_friends_count(
    db: &DatabaseConnection,
    account_id: i64,
) -> Result<account::Model> {
    use sea_orm::sea_query::Expr;

    Account::update_many()
        .col_expr(
            account::Column::FriendsCount,
            Expr::col(account::Column::FriendsCount).add(1),
        )
        .filter(account::Column::Id.eq(account_id))
        .exec(db)
        .await?;

    Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or(Error::AccountNotFound { id: account_id })
}
