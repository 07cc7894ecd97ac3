//! FloatRates daily feed.
//!
//! The payload is an object keyed by lowercase code, each entry carrying its
//! own `code` and a base-relative `rate`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "floatrates";
const BASE_URL: &str = "https://www.floatrates.com";

#[derive(Debug, Deserialize)]
struct FeedEntry {
    code: String,
    rate: Value,
}

pub struct FloatRatesProvider {
    client: Client,
    base_url: String,
}

impl FloatRatesProvider {
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
        let feed: BTreeMap<String, FeedEntry> = http::parse_json(PROVIDER_ID, body)?;
        Ok(feed
            .into_values()
            .filter_map(|entry| {
                let value = http::decimal_from_value(&entry.rate)?;
                Some(RawQuote::new(entry.code, value))
            })
            .collect())
    }
}

impl Default for FloatRatesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for FloatRatesProvider {
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
        let url = format!(
            "{}/daily/{}.json",
            self.base_url,
            request.base.to_lowercase()
        );
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
