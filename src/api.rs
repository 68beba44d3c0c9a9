use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::models::RatesResponse;

/// Where the current USD→VND rate comes from. The conversion service only
/// depends on this seam, so tests can inject fixed or failing providers.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_usd_to_vnd(&self) -> Result<f64>;
}

/// HTTP client for a `{base_url}/{base}` exchange-rate endpoint returning
/// `{ "base": "USD", "rates": { "VND": 24500.0, ... } }`.
pub struct ExchangeRateClient {
    client: Client,
    base_url: String,
    base_currency: String,
}

impl ExchangeRateClient {
    /// Requests are capped at 10s so a hanging provider cannot stall
    /// conversions; callers fall back to the cached or default rate.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            base_currency: config.base_currency.clone(),
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateClient {
    async fn fetch_usd_to_vnd(&self) -> Result<f64> {
        let url = format!("{}/{}", self.base_url, self.base_currency);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let text = response.text().await.context("Failed to get response text")?;

        if !status.is_success() {
            anyhow::bail!("API request failed: {}", text);
        }

        let rates: RatesResponse =
            serde_json::from_str(&text).context("Failed to parse rates response")?;

        let rate = rates
            .rates
            .get("VND")
            .copied()
            .context("No VND rate in response")?;

        if !rate.is_finite() || rate <= 0.0 {
            anyhow::bail!("Unusable VND rate in response: {}", rate);
        }

        Ok(rate)
    }
}
