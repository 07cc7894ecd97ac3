//! CoinGecko market listing priced directly in the base currency.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "coingecko";
const BASE_URL: &str = "https://api.coingecko.com";
const MARKETS_PATH: &str = "/api/v3/coins/markets";
const PAGE_SIZE: &str = "250";

#[derive(Debug, Deserialize)]
struct MarketItem {
    symbol: String,
    current_price: Option<f64>,
}

pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// Listing order is market-cap rank, which the conversion relies on for
    /// tickers shared by several coins.
    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let items: Vec<MarketItem> = http::parse_json(PROVIDER_ID, body)?;
        Ok(items
            .into_iter()
            .filter_map(|item| {
                let price = http::decimal_from_f64(item.current_price?)?;
                Some(RawQuote::new(item.symbol, price))
            })
            .collect())
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::crypto()
    }

    fn convention(&self, base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::PriceInversion {
            reference: base.clone(),
        }
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        let url = format!("{}{}", self.base_url, MARKETS_PATH);
        let vs_currency = request.base.to_lowercase();
        let body = http::fetch_text(
            PROVIDER_ID,
            self.client.get(&url).query(&[
                ("vs_currency", vs_currency.as_str()),
                ("per_page", PAGE_SIZE),
            ]),
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
