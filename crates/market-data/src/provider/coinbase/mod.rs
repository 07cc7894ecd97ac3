//! Coinbase exchange rates with API key request signing.
//!
//! Requests carry `CB-ACCESS-SIGN`, the hex HMAC-SHA256 of
//! `timestamp + "GET" + request_path` keyed with the API secret.

use std::collections::BTreeMap;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, quotes_from_map, ProviderCapabilities, RateProvider};

type HmacSha256 = Hmac<Sha256>;

const PROVIDER_ID: &str = "coinbase";
const BASE_URL: &str = "https://api.coinbase.com";
const API_VERSION: &str = "2021-06-03";

/// Environment variables holding the key pair.
pub const API_KEY_VAR: &str = "COINBASE_API_KEY";
pub const API_SECRET_VAR: &str = "COINBASE_API_SECRET";

#[derive(Debug, Deserialize)]
struct Envelope {
    data: ExchangeRates,
}

#[derive(Debug, Deserialize)]
struct ExchangeRates {
    #[serde(default)]
    rates: BTreeMap<String, Value>,
}

pub struct CoinbaseProvider {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

impl CoinbaseProvider {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, api_key, api_secret)
    }

    pub fn with_base_url(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Hex HMAC-SHA256 signature of a GET request.
    pub fn sign(
        secret: &str,
        timestamp: &str,
        request_path: &str,
    ) -> Result<String, MarketDataError> {
        let prehash = format!("{}GET{}", timestamp, request_path);
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| {
            MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Invalid HMAC secret length: {}", e),
            }
        })?;
        mac.update(prehash.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let envelope: Envelope = http::parse_json(PROVIDER_ID, body)?;
        Ok(quotes_from_map(envelope.data.rates))
    }

    fn missing_credentials(&self) -> Option<MarketDataError> {
        let mut missing = Vec::new();
        if self.api_key.trim().is_empty() {
            missing.push(API_KEY_VAR);
        }
        if self.api_secret.trim().is_empty() {
            missing.push(API_SECRET_VAR);
        }
        if missing.is_empty() {
            return None;
        }
        Some(MarketDataError::MissingCredentials {
            provider: PROVIDER_ID.to_string(),
            variables: missing.join(", "),
        })
    }
}

#[async_trait]
impl RateProvider for CoinbaseProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::crypto().with_credentials()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::Direct
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        if let Some(err) = self.missing_credentials() {
            return Err(err);
        }

        let request_path = format!("/v2/exchange-rates?currency={}", request.base);
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = Self::sign(&self.api_secret, &timestamp, &request_path)?;

        let body = http::fetch_text(
            PROVIDER_ID,
            self.client
                .get(format!("{}{}", self.base_url, request_path))
                .header("Content-Type", "application/json")
                .header("CB-ACCESS-KEY", &self.api_key)
                .header("CB-ACCESS-SIGN", signature)
                .header("CB-ACCESS-TIMESTAMP", &timestamp)
                .header("CB-VERSION", API_VERSION),
        )
        .await?;
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
