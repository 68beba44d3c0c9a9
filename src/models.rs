use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The two currencies the app knows about. VND is the storage currency,
/// USD the convertible display alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Vnd,
    Usd,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Vnd => "VND",
            Currency::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Vnd => "₫",
            Currency::Usd => "$",
        }
    }

    /// Decimal places of the currency's minimum display unit.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::Vnd => 0,
            Currency::Usd => 2,
        }
    }

    pub fn other(&self) -> Currency {
        match self {
            Currency::Vnd => Currency::Usd,
            Currency::Usd => Currency::Vnd,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "VND" | "₫" | "DONG" => Ok(Currency::Vnd),
            "USD" | "$" | "DOLLAR" => Ok(Currency::Usd),
            other => Err(format!("unknown currency: {}", other)),
        }
    }
}

/// A USD↔VND exchange rate observed at a point in time. Replaced wholesale
/// on each refresh, never mutated field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRate {
    /// VND per 1 USD, always positive.
    pub usd_to_vnd: f64,
    /// USD per 1 VND, derived as `1 / usd_to_vnd`.
    pub vnd_to_usd: f64,
    /// Unix seconds of the observation.
    pub last_updated: i64,
}

impl CurrencyRate {
    /// `usd_to_vnd` must be positive; the inverse rate is derived here so
    /// the two fields can never drift apart.
    pub fn new(usd_to_vnd: f64, last_updated: i64) -> Self {
        Self {
            usd_to_vnd,
            vnd_to_usd: 1.0 / usd_to_vnd,
            last_updated,
        }
    }
}

/// The user's chosen display currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPreference {
    pub display_currency: Currency,
}

impl Default for CurrencyPreference {
    fn default() -> Self {
        Self {
            display_currency: Currency::Vnd,
        }
    }
}

/// Response of the exchange-rate endpoint: rates per currency code for a
/// base currency.
#[derive(Debug, Deserialize)]
pub struct RatesResponse {
    pub base: String,
    pub rates: HashMap<String, f64>,
    // Catch-all for fields we don't care about
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_currency_from_str() {
        assert_eq!("vnd".parse::<Currency>(), Ok(Currency::Vnd));
        assert_eq!("USD".parse::<Currency>(), Ok(Currency::Usd));
        assert_eq!("₫".parse::<Currency>(), Ok(Currency::Vnd));
        assert!("EUR".parse::<Currency>().is_err());
    }

    #[test]
    fn test_rate_inverse_derived() {
        let rate = CurrencyRate::new(25_450.0, 1_700_000_000);
        assert_relative_eq!(rate.usd_to_vnd * rate.vnd_to_usd, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rate_serde_round_trip() {
        let rate = CurrencyRate::new(24_500.0, 1_700_000_000);
        let json = serde_json::to_string(&rate).unwrap();
        let back: CurrencyRate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rate);
    }

    #[test]
    fn test_preference_defaults_to_vnd() {
        assert_eq!(
            CurrencyPreference::default().display_currency,
            Currency::Vnd
        );
    }
}
