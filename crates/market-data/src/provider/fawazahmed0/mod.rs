//! fawazahmed0 currency-api, served from the jsDelivr CDN.
//!
//! Covers fiat and crypto in a single payload keyed by the lowercase base:
//! `{"date": "...", "chf": {"usd": 1.14, "btc": 0.0000119}}`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, quotes_from_map, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "fawazahmed0";
const BASE_URL: &str = "https://cdn.jsdelivr.net";
const API_PATH: &str = "/npm/@fawazahmed0/currency-api@latest/v1/currencies";

pub struct Fawazahmed0Provider {
    client: Client,
    base_url: String,
}

impl Fawazahmed0Provider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// Extract the rates nested under the base's lowercase key.
    pub fn parse(body: &str, base: &CurrencyCode) -> Result<Vec<RawQuote>, MarketDataError> {
        let mut payload: BTreeMap<String, Value> = http::parse_json(PROVIDER_ID, body)?;
        let key = base.to_lowercase();
        match payload.remove(&key) {
            Some(Value::Object(rates)) => Ok(quotes_from_map(rates)),
            _ => Err(MarketDataError::parse(
                PROVIDER_ID,
                format!("missing \"{}\" rates object", key),
            )),
        }
    }
}

impl Default for Fawazahmed0Provider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for Fawazahmed0Provider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat_and_crypto()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::Direct
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        let url = format!(
            "{}{}/{}.json",
            self.base_url,
            API_PATH,
            request.base.to_lowercase()
        );
        let body = http::fetch_text(PROVIDER_ID, self.client.get(&url)).await?;
        let quotes = Self::parse(&body, &request.base)?;
        normalize(
            PROVIDER_ID,
            &self.convention(&request.base),
            &quotes,
            request,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::request;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"{
        "date": "2026-01-02",
        "chf": {"usd": 1.1489, "btc": 0.0000119, "eur": 1.0638, "1inch": 4.2}
    }"#;

    #[test]
    fn test_parse_nested_base_object() {
        let quotes = Fawazahmed0Provider::parse(SAMPLE, &CurrencyCode::from("CHF")).unwrap();
        assert_eq!(quotes.len(), 4);
    }

    #[test]
    fn test_parse_requires_base_key() {
        let err = Fawazahmed0Provider::parse(SAMPLE, &CurrencyCode::from("EUR")).unwrap_err();
        assert!(matches!(err, MarketDataError::ParseError { .. }));
    }

    #[test]
    fn test_mixes_fiat_and_crypto() {
        let provider = Fawazahmed0Provider::new();
        let quotes = Fawazahmed0Provider::parse(SAMPLE, &CurrencyCode::from("CHF")).unwrap();
        let req = request("CHF", &["USD", "BTC"]);
        let output = normalize(
            PROVIDER_ID,
            &provider.convention(&req.base),
            &quotes,
            &req,
            None,
        )
        .unwrap();

        assert_eq!(output.rates.get("USD"), Some(&dec!(1.1489)));
        assert_eq!(output.rates.get("BTC"), Some(&dec!(0.0000119)));
        assert_eq!(output.len(), 2);
    }
}
