use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{CurrencyCode, ProviderId};

/// Request context for a provider fetch
#[derive(Clone, Debug)]
pub struct RateRequest {
    /// Currency every returned rate is expressed against
    pub base: CurrencyCode,

    /// Tracked codes of the kinds the provider covers; everything else is dropped
    pub currencies: BTreeSet<CurrencyCode>,
}

impl RateRequest {
    pub fn new(base: CurrencyCode, currencies: BTreeSet<CurrencyCode>) -> Self {
        Self { base, currencies }
    }
}

/// Normalized rates of one provider for one run.
///
/// `rates` maps each currency to the number of its units equal to one unit of
/// `base`. Keys are kept sorted so the serialized artifact is deterministic.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderOutput {
    /// Provider that produced the rates (ecb, coingecko, ...)
    pub provider: ProviderId,

    /// When the rates were fetched
    pub datetime: DateTime<Utc>,

    /// Base currency
    pub base: CurrencyCode,

    /// Units of currency per one unit of base
    #[serde(default)]
    pub rates: BTreeMap<CurrencyCode, Decimal>,
}

impl ProviderOutput {
    /// Create an output stamped with the current time
    pub fn new(
        provider: impl Into<ProviderId>,
        base: CurrencyCode,
        rates: BTreeMap<CurrencyCode, Decimal>,
    ) -> Self {
        Self {
            provider: provider.into(),
            datetime: Utc::now(),
            base,
            rates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_output_serializes_sorted_with_datetime_field() {
        let mut rates = BTreeMap::new();
        rates.insert(CurrencyCode::from("USD"), dec!(1.1));
        rates.insert(CurrencyCode::from("EUR"), dec!(0.9));
        let output = ProviderOutput::new("ecb", CurrencyCode::from("CHF"), rates);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["provider"], "ecb");
        assert_eq!(json["base"], "CHF");
        assert!(json["datetime"].is_string());

        let text = serde_json::to_string(&output.rates).unwrap();
        assert!(text.find("EUR").unwrap() < text.find("USD").unwrap());
    }

    #[test]
    fn test_output_reads_provider_artifact() {
        let raw = r#"{
            "provider": "provider_a",
            "datetime": "2026-01-01T00:00:00Z",
            "base": "CHF",
            "rates": { "usd": 1.1, "BTC": 0.00002 }
        }"#;
        let output: ProviderOutput = serde_json::from_str(raw).unwrap();

        assert_eq!(output.provider, "provider_a");
        assert_eq!(output.len(), 2);
        assert_eq!(output.rates.get("USD"), Some(&dec!(1.1)));
        assert_eq!(output.rates.get("BTC"), Some(&dec!(0.00002)));
    }

    #[test]
    fn test_output_without_rates_is_empty() {
        let raw = r#"{"provider":"empty","datetime":"2026-01-01T00:00:00Z","base":"CHF"}"#;
        let output: ProviderOutput = serde_json::from_str(raw).unwrap();
        assert!(output.is_empty());
    }
}
