//! Pricing business logic - persisted EUR-per-RP rate and price derivation.
//!
//! The rate defaults to the value in config.toml and can be overridden at
//! runtime through `/price set`; the override is persisted in the key-value
//! settings table so it survives restarts.

use crate::{
    entities::{Setting, setting},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Settings-table key under which the rate override is stored
const RATE_KEY: &str = "eur_per_rp";

/// Returns the effective EUR-per-RP rate.
///
/// Prefers the persisted override, falling back to `default_rate` from the
/// shop configuration. An unparseable stored value is treated as absent.
pub async fn get_rate(db: &DatabaseConnection, default_rate: f64) -> Result<f64> {
    let stored = Setting::find()
        .filter(setting::Column::Key.eq(RATE_KEY))
        .one(db)
        .await?;

    match stored {
        Some(row) => match row.value.parse::<f64>() {
            Ok(rate) if rate > 0.0 => Ok(rate),
            _ => {
                tracing::warn!(value = %row.value, "Ignoring unparseable stored price rate");
                Ok(default_rate)
            }
        },
        None => Ok(default_rate),
    }
}

/// Persists a new EUR-per-RP rate, replacing any previous override.
pub async fn set_rate(db: &DatabaseConnection, rate: f64) -> Result<f64> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(Error::InvalidAmount { amount: rate });
    }

    let existing = Setting::find()
        .filter(setting::Column::Key.eq(RATE_KEY))
        .one(db)
        .await?;

    let now = chrono::Utc::now();
    match existing {
        Some(row) => {
            let mut model: setting::ActiveModel = row.into();
            model.value = Set(rate.to_string());
            model.updated_at = Set(now);
            model.update(db).await?;
        }
        None => {
            let model = setting::ActiveModel {
                key: Set(RATE_KEY.to_string()),
                value: Set(rate.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            model.insert(db).await?;
        }
    }

    Ok(rate)
}

/// Derives the EUR price for an RP amount at the given rate.
#[must_use]
#[allow(clippy::cast_precision_loss)] // RP totals are far below 2^52
pub fn price_for_rp(total_rp: i64, eur_per_rp: f64) -> f64 {
    total_rp as f64 * eur_per_rp
}
