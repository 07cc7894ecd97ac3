//! ExchangeRate-API open access endpoint (`open.er-api.com`).

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, quotes_from_map, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "exchangerate";
const BASE_URL: &str = "https://open.er-api.com";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: BTreeMap<String, Value>,
}

pub struct ExchangeRateProvider {
    client: Client,
    base_url: String,
}

impl ExchangeRateProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// The API answers 200 with `"result": "error"` for unknown bases.
    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let latest: LatestResponse = http::parse_json(PROVIDER_ID, body)?;
        if latest.result != "success" {
            return Err(MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: latest
                    .error_type
                    .unwrap_or_else(|| format!("result: {}", latest.result)),
            });
        }
        Ok(quotes_from_map(latest.rates))
    }
}

impl Default for ExchangeRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for ExchangeRateProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::Direct
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        let url = format!("{}/v6/latest/{}", self.base_url, request.base);
        let body = http::fetch_text(PROVIDER_ID, self.client.get(&url)).await?;
        let quotes = Self::parse(&body)?;
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

    #[test]
    fn test_parse_success() {
        let body = r#"{"result": "success", "base_code": "CHF",
            "rates": {"CHF": 1, "USD": 1.1489, "EUR": 1.0638}}"#;
        let quotes = ExchangeRateProvider::parse(body).unwrap();
        assert_eq!(quotes.len(), 3);

        let provider = ExchangeRateProvider::new();
        let req = request("CHF", &["CHF", "USD"]);
        let output = normalize(
            PROVIDER_ID,
            &provider.convention(&req.base),
            &quotes,
            &req,
            None,
        )
        .unwrap();
        assert_eq!(output.rates.get("CHF"), Some(&dec!(1)));
        assert_eq!(output.rates.get("USD"), Some(&dec!(1.1489)));
    }

    #[test]
    fn test_parse_error_result() {
        let body = r#"{"result": "error", "error-type": "unsupported-code"}"#;
        let err = ExchangeRateProvider::parse(body).unwrap_err();
        assert!(err.to_string().contains("unsupported-code"));
    }
}
