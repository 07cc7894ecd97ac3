//! Coinranking coin listing.
//!
//! Coin prices are in USD. The base's `exchangeRate` from the
//! reference-currencies endpoint supplies the USD value of one base unit,
//! which is the pivot for the price inversion.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "coinranking";
const BASE_URL: &str = "https://api.coinranking.com";
const COINS_PATH: &str = "/v2/coins";
const REFERENCE_PATH: &str = "/v2/reference-currencies";
const COIN_LIMIT: &str = "100";

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "COINRANKING_API_KEY";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct CoinList {
    coins: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
struct Coin {
    symbol: String,
    #[serde(default)]
    price: Value,
}

#[derive(Debug, Deserialize)]
struct ReferenceList {
    currencies: Vec<ReferenceCurrency>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceCurrency {
    symbol: String,
    #[serde(default)]
    exchange_rate: Value,
}

pub struct CoinrankingProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CoinrankingProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// USD-priced coin quotes in listing (rank) order.
    pub fn parse_coins(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let list: Envelope<CoinList> = http::parse_json(PROVIDER_ID, body)?;
        Ok(list
            .data
            .coins
            .into_iter()
            .filter_map(|coin| {
                let price = http::decimal_from_value(&coin.price)?;
                Some(RawQuote::new(coin.symbol, price))
            })
            .collect())
    }

    /// USD value of one unit of `base`, from the reference-currency search.
    pub fn parse_pivot(body: &str, base: &CurrencyCode) -> Result<Decimal, MarketDataError> {
        let list: Envelope<ReferenceList> = http::parse_json(PROVIDER_ID, body)?;
        list.data
            .currencies
            .iter()
            .find(|c| CurrencyCode::from(c.symbol.as_str()) == *base)
            .and_then(|c| http::decimal_from_value(&c.exchange_rate))
            .filter(|rate| *rate > Decimal::ZERO)
            .ok_or_else(|| MarketDataError::MissingPivotRate {
                provider: PROVIDER_ID.to_string(),
                currency: base.to_string(),
            })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .header("x-access-token", &self.api_key)
    }
}

#[async_trait]
impl RateProvider for CoinrankingProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::crypto().with_credentials()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::PriceInversion {
            reference: CurrencyCode::from("USD"),
        }
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        if self.api_key.trim().is_empty() {
            return Err(MarketDataError::MissingCredentials {
                provider: PROVIDER_ID.to_string(),
                variables: API_KEY_VAR.to_string(),
            });
        }

        let convention = self.convention(&request.base);
        let body = http::fetch_text(
            PROVIDER_ID,
            self.get(COINS_PATH).query(&[("limit", COIN_LIMIT)]),
        )
        .await?;
        let quotes = Self::parse_coins(&body)?;

        let pivot = if convention.reference() == Some(&request.base) {
            None
        } else {
            let body = http::fetch_text(
                PROVIDER_ID,
                self.get(REFERENCE_PATH)
                    .query(&[("search", request.base.as_str())]),
            )
            .await?;
            Some(Self::parse_pivot(&body, &request.base)?)
        };

        normalize(PROVIDER_ID, &convention, &quotes, request, pivot)
    }
}
