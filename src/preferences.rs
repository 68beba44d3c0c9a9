// SPDX-FileCopyrightText: 2025 Joost van der Laan
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use sqlx::sqlite::SqlitePool;

use crate::models::CurrencyPreference;
use crate::store;

const PREFERENCE_KEY: &str = "display_currency";

/// Durable storage for the user's display-currency choice.
pub struct PreferenceStore {
    pool: SqlitePool,
}

impl PreferenceStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored preference, or the VND default when nothing was ever set.
    pub async fn get(&self) -> Result<CurrencyPreference> {
        match store::kv_get(&self.pool, PREFERENCE_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(CurrencyPreference::default()),
        }
    }

    /// Persist the preference. The write has completed when this returns.
    pub async fn set(&self, preference: &CurrencyPreference) -> Result<()> {
        store::kv_put(
            &self.pool,
            PREFERENCE_KEY,
            &serde_json::to_string(preference)?,
        )
        .await
    }
}
