use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::publish_model::{MetaDocument, Publication, RatesDocument};
use crate::consensus::{ConsensusTable, ObservationSet};
use kurs_market_data::CurrencyCode;

/// Assemble the rates and metadata documents for one run.
pub fn assemble(
    date: NaiveDate,
    consensus: &ConsensusTable,
    observations: &ObservationSet,
    names: BTreeMap<CurrencyCode, String>,
) -> Publication {
    let rates = RatesDocument(consensus.as_map().clone());

    let providers = observations
        .codes()
        .map(|code| (code.clone(), observations.providers_for(code.as_str())))
        .collect();

    let meta = MetaDocument {
        date,
        count: rates.len(),
        names,
        providers,
    };

    Publication { rates, meta }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{collect, consensus};
    use kurs_market_data::ProviderOutput;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn output(provider: &'static str, rates: &[(&str, Decimal)]) -> ProviderOutput {
        let rates: BTreeMap<CurrencyCode, Decimal> = rates
            .iter()
            .map(|(code, value)| (CurrencyCode::from(*code), *value))
            .collect();
        ProviderOutput::new(provider, CurrencyCode::from("CHF"), rates)
    }

    #[test]
    fn test_assembles_sorted_documents() {
        let outputs = vec![
            output("provider_b", &[("USD", dec!(1.2))]),
            output("provider_a", &[("USD", dec!(1.1)), ("BTC", dec!(0.00002))]),
        ];
        let observations = collect(&outputs);
        let table = consensus(&observations);
        let names: BTreeMap<CurrencyCode, String> = [
            (CurrencyCode::from("USD"), "US Dollar".to_string()),
            (CurrencyCode::from("GBP"), "British Pound".to_string()),
        ]
        .into_iter()
        .collect();

        let date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        let publication = assemble(date, &table, &observations, names);

        let rates = serde_json::to_string(&publication.rates).unwrap();
        assert!(rates.find("BTC").unwrap() < rates.find("USD").unwrap());
        let rates: serde_json::Value = serde_json::from_str(&rates).unwrap();
        assert_eq!(rates["USD"].as_f64(), Some(1.15));
        assert_eq!(rates["BTC"].as_f64(), Some(0.00002));

        let meta = serde_json::to_value(&publication.meta).unwrap();
        assert_eq!(meta["date"], "2026-01-02");
        assert_eq!(meta["count"], 2);
        assert_eq!(meta["names"]["GBP"], "British Pound");
        assert_eq!(
            meta["providers"]["USD"],
            serde_json::json!(["provider_a", "provider_b"])
        );
        assert_eq!(meta["providers"]["BTC"], serde_json::json!(["provider_a"]));
    }
}
