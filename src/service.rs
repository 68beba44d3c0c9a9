use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqlitePool;

use crate::amount;
use crate::api::RateProvider;
use crate::models::{Currency, CurrencyPreference, CurrencyRate};
use crate::preferences::PreferenceStore;
use crate::rates::{self, RateCache};

/// Convert between the storage currency (VND) and the display alternative
/// (USD) with an already-obtained rate. Pure arithmetic; the cache is not
/// touched.
pub fn convert_amount(amount: f64, from: Currency, to: Currency, rate: &CurrencyRate) -> f64 {
    if from == to {
        return amount;
    }

    match (from, to) {
        (Currency::Usd, Currency::Vnd) => amount * rate.usd_to_vnd,
        (Currency::Vnd, Currency::Usd) => amount * rate.vnd_to_usd,
        _ => amount,
    }
}

/// Ties together the rate cache, the live provider and the display-currency
/// mode. Constructed once at startup and passed by reference to consumers.
///
/// Conversions never fail: a dead provider degrades to the last cached rate,
/// and an empty cache degrades to the hardcoded default.
pub struct CurrencyService {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
    preferences: PreferenceStore,
    display_currency: Mutex<Currency>,
    refresh_guard: tokio::sync::Mutex<()>,
}

impl CurrencyService {
    /// Reads the persisted display currency once; everything else is lazy.
    pub async fn new(pool: SqlitePool, provider: Arc<dyn RateProvider>) -> Result<Self> {
        let preferences = PreferenceStore::new(pool.clone());
        let display_currency = preferences.get().await?.display_currency;
        Ok(Self {
            provider,
            cache: RateCache::new(pool),
            preferences,
            display_currency: Mutex::new(display_currency),
            refresh_guard: tokio::sync::Mutex::new(()),
        })
    }

    /// The rate to convert with right now: the fresh cached rate if there is
    /// one, otherwise the result of a (coalesced) refresh, otherwise the
    /// stale cache, otherwise the hardcoded default.
    pub async fn current_rate(&self) -> CurrencyRate {
        if let Some(rate) = self.fresh_cached(Utc::now().timestamp()).await {
            return rate;
        }

        // One refresh in flight at a time. Late arrivals queue here and pick
        // up the refreshed rate from the re-check instead of fetching again.
        let _refresh = self.refresh_guard.lock().await;
        if let Some(rate) = self.fresh_cached(Utc::now().timestamp()).await {
            return rate;
        }

        match self.provider.fetch_usd_to_vnd().await {
            Ok(usd_to_vnd) => {
                let rate = CurrencyRate::new(usd_to_vnd, Utc::now().timestamp());
                if let Err(e) = self.cache.put(&rate).await {
                    eprintln!("⚠️  Warning: failed to cache exchange rate: {}", e);
                }
                rate
            }
            Err(e) => {
                eprintln!("⚠️  Warning: exchange rate fetch failed: {}", e);
                match self.cache.get().await {
                    Ok(Some(stale)) => stale,
                    _ => rates::fallback_rate(),
                }
            }
        }
    }

    async fn fresh_cached(&self, now: i64) -> Option<CurrencyRate> {
        match self.cache.get().await {
            Ok(Some(rate)) if rates::is_fresh(&rate, now) => Some(rate),
            Ok(_) => None,
            Err(e) => {
                eprintln!("⚠️  Warning: failed to read cached exchange rate: {}", e);
                None
            }
        }
    }

    /// VND per USD under the active rate. Exactly 24 000 when there is no
    /// cache and the provider is unreachable.
    pub async fn display_rate(&self) -> f64 {
        self.current_rate().await.usd_to_vnd
    }

    pub async fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        let rate = self.current_rate().await;
        convert_amount(amount, from, to, &rate)
    }

    pub fn display_currency(&self) -> Currency {
        *self
            .display_currency
            .lock()
            .expect("display currency lock poisoned")
    }

    /// Flip VND↔USD and persist the choice. A failed write keeps the
    /// in-memory toggle for this process; the preference reverts at the next
    /// launch.
    pub async fn toggle_display_currency(&self) -> Currency {
        let current = {
            let mut mode = self
                .display_currency
                .lock()
                .expect("display currency lock poisoned");
            *mode = mode.other();
            *mode
        };
        let preference = CurrencyPreference {
            display_currency: current,
        };
        if let Err(e) = self.preferences.set(&preference).await {
            eprintln!("⚠️  Warning: failed to persist currency preference: {}", e);
        }
        current
    }

    /// Format `amount` in the active display currency.
    pub fn format_display(&self, amount: f64) -> String {
        amount::format_amount(amount, self.display_currency())
    }
}
