//! Currency core of the money-tracking app: free-form VND/USD amount
//! parsing and display formatting, a TTL-cached USD↔VND exchange rate with
//! coalesced refresh, and the durable display-currency preference.

pub mod amount;
pub mod api;
pub mod config;
pub mod models;
pub mod preferences;
pub mod rates;
pub mod service;
pub mod store;

pub use amount::{format_amount, format_number, parse_amount};
pub use models::{Currency, CurrencyPreference, CurrencyRate};
pub use rates::{DEFAULT_USD_TO_VND, RATE_TTL_SECS};
pub use service::{convert_amount, CurrencyService};
