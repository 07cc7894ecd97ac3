//! Czech National Bank daily rates.
//!
//! Rows state the CZK price of `amount` units of a currency (100 JPY, 1 USD).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "cnb";
const BASE_URL: &str = "https://api.cnb.cz";
const DAILY_PATH: &str = "/cnbapi/exrates/daily";

#[derive(Debug, Deserialize)]
struct DailyRates {
    rates: Vec<DailyRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyRow {
    currency_code: String,
    amount: f64,
    rate: f64,
}

/// CNB foreign exchange market rates.
pub struct CnbProvider {
    client: Client,
    base_url: String,
}

impl CnbProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// Extract lot-sized CZK quotes.
    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let daily: DailyRates = http::parse_json(PROVIDER_ID, body)?;
        Ok(daily
            .rates
            .into_iter()
            .filter_map(|row| {
                let value = http::decimal_from_f64(row.rate)?;
                let lot = http::decimal_from_f64(row.amount)?;
                Some(RawQuote::with_lot(row.currency_code, value, lot))
            })
            .collect())
    }
}

impl Default for CnbProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for CnbProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::LotSized {
            reference: CurrencyCode::from("CZK"),
        }
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        let url = format!("{}{}", self.base_url, DAILY_PATH);
        let body =
            http::fetch_text(PROVIDER_ID, self.client.get(&url).query(&[("lang", "EN")])).await?;
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
