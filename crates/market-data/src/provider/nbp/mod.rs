//! Narodowy Bank Polski table A mid rates.
//!
//! NBP publishes the PLN price of one unit of each currency. Rates against
//! the base are `PLN per base / PLN per X`; PLN itself is priced implicitly.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};
use crate::provider::{http, normalize, ProviderCapabilities, RateProvider};

const PROVIDER_ID: &str = "nbp";
const BASE_URL: &str = "https://api.nbp.pl";
const TABLE_PATH: &str = "/api/exchangerates/tables/a/";

#[derive(Debug, Deserialize)]
struct RateTable {
    rates: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    code: String,
    mid: f64,
}

/// NBP average exchange rates (table A).
pub struct NbpProvider {
    client: Client,
    base_url: String,
}

impl NbpProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: http::client(),
            base_url: base_url.into(),
        }
    }

    /// Extract PLN-per-unit quotes from the first table in the response.
    pub fn parse(body: &str) -> Result<Vec<RawQuote>, MarketDataError> {
        let tables: Vec<RateTable> = http::parse_json(PROVIDER_ID, body)?;
        let table = tables
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::parse(PROVIDER_ID, "empty table list"))?;

        Ok(table
            .rates
            .into_iter()
            .filter_map(|row| {
                let value = http::decimal_from_f64(row.mid)?;
                Some(RawQuote::new(row.code, value))
            })
            .collect())
    }
}

impl Default for NbpProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for NbpProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::fiat()
    }

    fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
        QuoteConvention::BaseDenominated {
            reference: CurrencyCode::from("PLN"),
        }
    }

    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError> {
        let url = format!("{}{}", self.base_url, TABLE_PATH);
        let body = http::fetch_text(
            PROVIDER_ID,
            self.client.get(&url).query(&[("format", "json")]),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::test_support::request;
    use rust_decimal_macros::dec;

    const SAMPLE: &str = r#"[{
        "table": "A",
        "no": "001/A/NBP/2026",
        "effectiveDate": "2026-01-02",
        "rates": [
            {"currency": "dolar amerykański", "code": "USD", "mid": 4.0},
            {"currency": "frank szwajcarski", "code": "CHF", "mid": 4.5},
            {"currency": "euro", "code": "EUR", "mid": 4.32}
        ]
    }]"#;

    #[test]
    fn test_parse_first_table() {
        let quotes = NbpProvider::parse(SAMPLE).unwrap();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[1].code.as_str(), "CHF");
        assert_eq!(quotes[1].value, dec!(4.5));
    }

    #[test]
    fn test_parse_rejects_empty_list() {
        assert!(NbpProvider::parse("[]").is_err());
    }

    #[test]
    fn test_normalizes_through_pln() {
        let provider = NbpProvider::new();
        let quotes = NbpProvider::parse(SAMPLE).unwrap();
        let req = request("CHF", &["USD", "EUR", "PLN"]);
        let output = normalize(
            PROVIDER_ID,
            &provider.convention(&req.base),
            &quotes,
            &req,
            None,
        )
        .unwrap();

        assert_eq!(output.rates.get("USD"), Some(&dec!(1.125)));
        assert_eq!(output.rates.get("EUR").unwrap().round_dp(4), dec!(1.0417));
        assert_eq!(output.rates.get("PLN"), Some(&dec!(4.5)));
    }

    #[test]
    fn test_missing_chf_row_is_a_pivot_error() {
        let provider = NbpProvider::new();
        let body = r#"[{"rates": [{"code": "USD", "mid": 4.0}]}]"#;
        let quotes = NbpProvider::parse(body).unwrap();
        let req = request("CHF", &["USD"]);
        let err = normalize(
            PROVIDER_ID,
            &provider.convention(&req.base),
            &quotes,
            &req,
            None,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            MarketDataError::MissingPivotRate { ref currency, .. } if currency == "CHF"
        ));
    }
}
