//! Environment configuration for the `kurs` binary.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use kurs_core::constants::{DEFAULT_BASE_CURRENCY, DEFAULT_DEVIATION_THRESHOLD};
use kurs_core::pipeline::PipelineConfig;
use kurs_market_data::provider::{coinbase, coinranking, openexchangerates};
use kurs_market_data::CurrencyCode;
use rust_decimal::Decimal;

const DEFAULT_CATALOG_DIR: &str = "./data";
const DEFAULT_OUTPUT_DIR: &str = "./output";
const DEFAULT_PUBLIC_DIR: &str = "./public";
const DEFAULT_FETCH_ATTEMPTS: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Keys for providers that need them. `None` leaves the provider out.
#[derive(Clone, Default)]
pub struct Credentials {
    pub openexchangerates_app_id: Option<String>,
    pub coinranking_api_key: Option<String>,
    pub coinbase_api_key: Option<String>,
    pub coinbase_api_secret: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("openexchangerates_app_id", &mask(&self.openexchangerates_app_id))
            .field("coinranking_api_key", &mask(&self.coinranking_api_key))
            .field("coinbase_api_key", &mask(&self.coinbase_api_key))
            .field("coinbase_api_secret", &mask(&self.coinbase_api_secret))
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub base_currency: CurrencyCode,
    pub catalog_dir: PathBuf,
    pub output_dir: PathBuf,
    pub public_dir: PathBuf,
    pub deviation_threshold: Decimal,
    pub fetch_attempts: u32,
    pub log_format: LogFormat,
    pub credentials: Credentials,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let base_currency =
            CurrencyCode::new(get("KURS_BASE_CURRENCY").unwrap_or_else(|| DEFAULT_BASE_CURRENCY.into()));

        let deviation_threshold = match get("KURS_DEVIATION_THRESHOLD") {
            Some(raw) => Decimal::from_str(&raw)
                .with_context(|| format!("KURS_DEVIATION_THRESHOLD is not a number: {}", raw))?,
            None => DEFAULT_DEVIATION_THRESHOLD,
        };
        if deviation_threshold <= Decimal::ZERO {
            bail!("KURS_DEVIATION_THRESHOLD must be positive, got {}", deviation_threshold);
        }

        let fetch_attempts = match get("KURS_FETCH_ATTEMPTS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("KURS_FETCH_ATTEMPTS is not a count: {}", raw))?,
            None => DEFAULT_FETCH_ATTEMPTS,
        };

        let log_format = match get("KURS_LOG_FORMAT") {
            Some(raw) if raw.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            base_currency,
            catalog_dir: PathBuf::from(get("KURS_CATALOG_DIR").unwrap_or_else(|| DEFAULT_CATALOG_DIR.into())),
            output_dir: PathBuf::from(get("KURS_OUTPUT_DIR").unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into())),
            public_dir: PathBuf::from(get("KURS_PUBLIC_DIR").unwrap_or_else(|| DEFAULT_PUBLIC_DIR.into())),
            deviation_threshold,
            fetch_attempts: fetch_attempts.max(1),
            log_format,
            credentials: Credentials {
                openexchangerates_app_id: get(openexchangerates::APP_ID_VAR),
                coinranking_api_key: get(coinranking::API_KEY_VAR),
                coinbase_api_key: get(coinbase::API_KEY_VAR),
                coinbase_api_secret: get(coinbase::API_SECRET_VAR),
            },
        })
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            base: self.base_currency.clone(),
            deviation_threshold: self.deviation_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.base_currency.as_str(), "CHF");
        assert_eq!(config.catalog_dir, PathBuf::from("./data"));
        assert_eq!(config.deviation_threshold, dec!(0.10));
        assert_eq!(config.fetch_attempts, 3);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.credentials.coinbase_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("KURS_BASE_CURRENCY", "eur"),
            ("KURS_DEVIATION_THRESHOLD", "0.05"),
            ("KURS_FETCH_ATTEMPTS", "0"),
            ("KURS_LOG_FORMAT", "JSON"),
            ("COINRANKING_API_KEY", "key"),
            ("OPENEXCHANGERATES_APP_ID", "   "),
        ])
        .unwrap();

        assert_eq!(config.base_currency.as_str(), "EUR");
        assert_eq!(config.deviation_threshold, dec!(0.05));
        assert_eq!(config.fetch_attempts, 1);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.credentials.coinranking_api_key.as_deref(), Some("key"));
        assert!(config.credentials.openexchangerates_app_id.is_none());
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        assert!(config(&[("KURS_DEVIATION_THRESHOLD", "ten")]).is_err());
        assert!(config(&[("KURS_DEVIATION_THRESHOLD", "-0.1")]).is_err());
    }

    #[test]
    fn test_credentials_are_masked_in_debug() {
        let config = config(&[("COINBASE_API_SECRET", "s3cr3t")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("s3cr3t"));
    }
}
