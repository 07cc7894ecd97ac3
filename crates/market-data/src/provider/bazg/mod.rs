//! Swiss Federal Office for Customs and Border Security (BAZG) daily rates.
//!
//! Each `<devise>` entry states how many CHF a lot of the foreign currency
//! costs, e.g. `<waehrung>100 JPY</waehrung><kurs>0.5723</kurs>`.

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use rust_decimal::Decimal;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "bazg";
const BASE_URL: &str = "https://www.backend-rates.bazg.admin.ch";
const DAILY_PATH: &str = "/api/xmldaily";

lazy_static! {
    static ref DEVISE: Regex = Regex::new(
        r"<devise[^>]*>[\s\S]*?<waehrung>(\d+)\s+(\w+)</waehrung>\s*<kurs>([\d.]+)</kurs>[\s\S]*?</devise>"
    )
    .expect("valid BAZG devise pattern");
}

/// BAZG daily exchange rates, quoted in CHF per lot.
pub struct BazgProvider {
    client: Client,
    base_url: String,
}

impl BazgProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// Extract lot-sized CHF quotes from the daily XML.
    pub fn parse(xml: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let quotes: Vec<RawQuote> = DEVISE
            .captures_iter(xml)
            .filter_map(|caps| {
                let lot = caps[1].parse::<u32>().ok().map(Decimal::from)?;
                let value = http::decimal_from_str(&caps[3])?;
                Some(RawQuote::with_lot(&caps[2], value, lot))
            })
            .collect();

        if quotes.is_empty() {
            return Err(MarketDataError::parse(PROVIDER_ID, "no <devise> entries"));
        }
        Ok(quotes)
    }
}

impl Default for BazgProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for BazgProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::LotSized {
            reference: CurrencyCode::from("CHF"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::request;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wechselkurse>
  <datum>02.01.2026</datum>
  <devise code="usd">
    <land_de>Vereinigte Staaten</land_de>
    <waehrung>1 USD</waehrung>
    <kurs>0.8000</kurs>
  </devise>
  <devise code="jpy">
    <land_de>Japan</land_de>
    <waehrung>100 JPY</waehrung>
    <kurs>0.5000</kurs>
  </devise>
</wechselkurse>"#;

    #[test]
    fn test_parse_lot_sizes() {
        let quotes = BazgProvider::parse(SAMPLE).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[1].code.as_str(), "JPY");
        assert_eq!(quotes[1].lot, dec!(100));
        assert_eq!(quotes[1].value, dec!(0.5));
    }

    #[test]
    fn test_normalizes_lot_over_price() {
        let provider = BazgProvider::new();
        let quotes = BazgProvider::parse(SAMPLE).unwrap();
        let req = request("CHF", &["USD", "JPY"]);
        let output = normalize(
            PROVIDER_ID,
            &provider.convention(&req.base),
            &quotes,
            &req,
            None,
        )
        .unwrap();

        assert_eq!(output.rates.get("USD"), Some(&dec!(1.25)));
        assert_eq!(output.rates.get("JPY"), Some(&dec!(200)));
    }

    #[test]
    fn test_non_chf_base_needs_pivot() {
        let provider = BazgProvider::new();
        let quotes = BazgProvider::parse(SAMPLE).unwrap();

        let req = request("USD", &["JPY"]);
        let output = normalize(
            PROVIDER_ID,
            &provider.convention(&req.base),
            &quotes,
            &req,
            None,
        )
        .unwrap();
        // 1 USD = 0.8 CHF, 1 JPY = 0.005 CHF
        assert_eq!(output.rates.get("JPY"), Some(&dec!(160)));

        let req = request("EUR", &["JPY"]);
        let err = normalize(
            PROVIDER_ID,
            &provider.convention(&req.base),
            &quotes,
            &req,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, MarketDataError::MissingPivotRate { .. }));
    }
}
