//! Open Exchange Rates `latest.json`.
//!
//! The free plan only serves USD-based rates, so every rate is divided by the
//! base's own USD rate.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, quotes_from_map, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "openexchangerates";
const BASE_URL: &str = "https://openexchangerates.org";
const LATEST_PATH: &str = "/api/latest.json";

/// Environment variable holding the app id.
pub const APP_ID_VAR: &str = "OPENEXCHANGERATES_APP_ID";

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    rates: BTreeMap<String, Value>,
}

pub struct OpenExchangeRatesProvider {
    client: Client,
    base_url: String,
    app_id: String,
}

impl OpenExchangeRatesProvider {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, app_id)
    }

    pub fn with_base_url(base_url: impl Into<String>, app_id: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
            app_id: app_id.into(),
        }
    }

    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let latest: LatestResponse = http::parse_json(PROVIDER_ID, body)?;
        Ok(quotes_from_map(latest.rates))
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat().with_credentials()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::ReferenceDenominated {
            reference: CurrencyCode::from("USD"),
        }
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        if self.app_id.trim().is_empty() {
            return Err(MarketDataError::MissingCredentials {
                provider: PROVIDER_ID.to_string(),
                variables: APP_ID_VAR.to_string(),
            });
        }

        let url = format!("{}{}", self.base_url, LATEST_PATH);
        let body = http::fetch_text(
            PROVIDER_ID,
            self.client
                .get(&url)
                .query(&[("app_id", self.app_id.as_str())]),
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
