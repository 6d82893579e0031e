//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`STOCKLEDGER_*`)
//! 2. Defaults (this file)
//!
//! A malformed variable is logged and ignored; the default stays in force.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

use stockledger_core::validation::validate_page_size;
use stockledger_core::{Rate, DEFAULT_DISCOUNT_RATE_BPS, DEFAULT_PAGE_SIZE, DEFAULT_TAX_RATE_BPS};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Store name (printed on bills by the UI)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Tax applied to new bills. Default 19%.
    pub tax_rate: Rate,

    /// Discount applied to new bills. Default 0%.
    pub discount_rate: Rate,

    /// Rows per page when a listing command gets no page size.
    pub page_size: u32,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "StockLedger Dev Store".to_string(),
            currency_symbol: "$".to_string(),
            tax_rate: Rate::from_bps(DEFAULT_TAX_RATE_BPS),
            discount_rate: Rate::from_bps(DEFAULT_DISCOUNT_RATE_BPS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `STOCKLEDGER_STORE_NAME`: Override store name
    /// - `STOCKLEDGER_TAX_RATE`: Tax percentage (e.g., "19" or "8.25")
    /// - `STOCKLEDGER_DISCOUNT_RATE`: Discount percentage
    /// - `STOCKLEDGER_PAGE_SIZE`: Default page size
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("STOCKLEDGER_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(rate) = rate_var(&lookup, "STOCKLEDGER_TAX_RATE") {
            config.tax_rate = rate;
        }

        if let Some(rate) = rate_var(&lookup, "STOCKLEDGER_DISCOUNT_RATE") {
            config.discount_rate = rate;
        }

        if let Some(raw) = lookup("STOCKLEDGER_PAGE_SIZE") {
            match raw.trim().parse::<u32>() {
                Ok(size) if validate_page_size(size).is_ok() => config.page_size = size,
                _ => warn!(value = %raw, "Ignoring invalid STOCKLEDGER_PAGE_SIZE"),
            }
        }

        config
    }

    /// Formats an amount as a currency string, rounded half away from zero
    /// to cents.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use stockledger_app::state::ConfigState;
    ///
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Decimal::new(20881, 4)), "$2.09");
    /// ```
    pub fn format_currency(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!("{}{}{:.2}", sign, self.currency_symbol, rounded.abs())
    }
}

fn rate_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Rate> {
    let raw = lookup(key)?;
    let parsed = Decimal::from_str(raw.trim())
        .ok()
        .and_then(|percent| Rate::from_percent(percent).ok());

    if parsed.is_none() {
        warn!(key, value = %raw, "Ignoring invalid rate");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> ConfigState {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigState::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::default();
        assert_eq!(config.tax_rate.bps(), 1900);
        assert!(config.discount_rate.is_zero());
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_env_overrides() {
        let config = config_with(&[
            ("STOCKLEDGER_STORE_NAME", "Corner Shop"),
            ("STOCKLEDGER_TAX_RATE", "8.25"),
            ("STOCKLEDGER_DISCOUNT_RATE", "10"),
            ("STOCKLEDGER_PAGE_SIZE", "25"),
        ]);

        assert_eq!(config.store_name, "Corner Shop");
        assert_eq!(config.tax_rate.bps(), 825);
        assert_eq!(config.discount_rate.bps(), 1000);
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_invalid_overrides_keep_defaults() {
        let config = config_with(&[
            ("STOCKLEDGER_TAX_RATE", "abc"),
            ("STOCKLEDGER_DISCOUNT_RATE", "150"),
            ("STOCKLEDGER_PAGE_SIZE", "0"),
        ]);

        assert_eq!(config, ConfigState::default());
    }

    #[test]
    fn test_format_currency_positive() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Decimal::new(1234, 2)), "$12.34");
        assert_eq!(config.format_currency(Decimal::ONE), "$1.00");
        assert_eq!(config.format_currency(Decimal::new(1, 2)), "$0.01");
        assert_eq!(config.format_currency(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_format_currency_rounds_half_away_from_zero() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Decimal::new(1005, 3)), "$1.01");
        assert_eq!(config.format_currency(Decimal::new(-1005, 3)), "-$1.01");
        assert_eq!(config.format_currency(Decimal::new(-1, 3)), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Decimal::new(-1234, 2)), "-$12.34");
    }
}
