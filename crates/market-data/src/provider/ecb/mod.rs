//! European Central Bank reference rates.
//!
//! The daily feed is an XML document of `<Cube currency='USD' rate='1.0823'/>`
//! entries, each giving units of the currency per one EUR. Conversion to the
//! base divides by the base currency's own entry; EUR itself is priced
//! implicitly.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "ecb";
const BASE_URL: &str = "https://www.ecb.europa.eu";
const DAILY_PATH: &str = "/stats/eurofxref/eurofxref-daily.xml";

lazy_static! {
    static ref CUBE_RATE: Regex =
        Regex::new(r#"currency=['"]([A-Za-z]{3})['"]\s+rate=['"]([^'"]+)['"]"#)
            .expect("valid ECB cube pattern");
}

/// ECB euro foreign exchange reference rates.
pub struct EcbProvider {
    client: Client,
    base_url: String,
}

impl EcbProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at another host (mirrors, tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// Extract the EUR-denominated quotes from the daily XML.
    pub fn parse(xml: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let quotes: Vec<RawQuote> = CUBE_RATE
            .captures_iter(xml)
            .filter_map(|caps| {
                let value = http::decimal_from_str(&caps[2])?;
                Some(RawQuote::new(&caps[1], value))
            })
            .collect();

        if quotes.is_empty() {
            return Err(MarketDataError::parse(PROVIDER_ID, "no <Cube> rate entries"));
        }
        Ok(quotes)
    }
}

impl Default for EcbProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for EcbProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::ReferenceDenominated {
            reference: CurrencyCode::from("EUR"),
        }
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        let url = format!("{}{}", self.base_url, DAILY_PATH);
        let xml = http::fetch_text(PROVIDER_ID, self.client.get(&url)).await?;
        let quotes = Self::parse(&xml)?;
        normalize(
            PROVIDER_ID,
            &self.convention(&request.base),
            &quotes,
            request,
            None,
        )
    }
}
