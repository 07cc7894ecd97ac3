//! Frankfurter (ECB-backed open API) latest rates, requested against the base.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, quotes_from_map, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "frankfurter";
const BASE_URL: &str = "https://api.frankfurter.dev";
const LATEST_PATH: &str = "/v1/latest";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: BTreeMap<String, Value>,
}

pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let latest: LatestResponse = http::parse_json(PROVIDER_ID, body)?;
        Ok(quotes_from_map(latest.rates))
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
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
        let url = format!("{}{}", self.base_url, LATEST_PATH);
        let body = http::fetch_text(
            PROVIDER_ID,
            self.client
                .get(&url)
                .query(&[("base", request.base.as_str())]),
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
