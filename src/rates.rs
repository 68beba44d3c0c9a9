// SPDX-FileCopyrightText: 2025 Joost van der Laan
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use sqlx::sqlite::SqlitePool;

use crate::models::CurrencyRate;
use crate::store;

const RATE_KEY: &str = "exchange_rate";

/// A cached rate older than this is stale and refetched on next access.
pub const RATE_TTL_SECS: i64 = 60 * 60;

/// Used when there is no cached rate and the provider is unreachable:
/// 1 USD = 24 000 VND.
pub const DEFAULT_USD_TO_VND: f64 = 24_000.0;

/// True while the rate is younger than the TTL.
pub fn is_fresh(rate: &CurrencyRate, now: i64) -> bool {
    now - rate.last_updated < RATE_TTL_SECS
}

/// The hardcoded fallback. `last_updated` is 0 so it never counts as fresh
/// and the next access retries the live fetch.
pub fn fallback_rate() -> CurrencyRate {
    CurrencyRate::new(DEFAULT_USD_TO_VND, 0)
}

/// Persistence for the most recent exchange rate.
///
/// The whole `CurrencyRate` is stored as one JSON value under one key, so
/// the rate fields and their timestamp commit together; a crash cannot leave
/// a new rate next to an old timestamp.
pub struct RateCache {
    pool: SqlitePool,
}

impl RateCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Last persisted rate, fresh or not.
    pub async fn get(&self) -> Result<Option<CurrencyRate>> {
        match store::kv_get(&self.pool, RATE_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the persisted rate.
    pub async fn put(&self, rate: &CurrencyRate) -> Result<()> {
        store::kv_put(&self.pool, RATE_KEY, &serde_json::to_string(rate)?).await
    }
}
