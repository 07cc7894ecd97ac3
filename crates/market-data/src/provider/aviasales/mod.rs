//! Aviasales currency table.
//!
//! A flat object of lowercase codes to the RUB price of one unit.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, quotes_from_map, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "aviasales";
const BASE_URL: &str = "https://www.aviasales.com";
const CURRENCY_PATH: &str = "/currency.json";

/// Aviasales fare currency rates, quoted in RUB.
pub struct AviasalesProvider {
    client: Client,
    base_url: String,
}

impl AviasalesProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// Extract RUB-per-unit quotes; entries that are not numbers are ignored.
    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let table: BTreeMap<String, Value> = http::parse_json(PROVIDER_ID, body)?;
        Ok(quotes_from_map(table))
    }
}

impl Default for AviasalesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for AviasalesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::BaseDenominated {
            reference: CurrencyCode::from("RUB"),
        }
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        let url = format!("{}{}", self.base_url, CURRENCY_PATH);
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
