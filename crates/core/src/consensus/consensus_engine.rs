use super::consensus_model::{ConsensusTable, ObservationSet};
use super::median::median;

/// Median value per currency.
pub fn consensus(observations: &ObservationSet) -> ConsensusTable {
    observations
        .iter()
        .filter_map(|(code, list)| {
            let values: Vec<_> = list.iter().map(|o| o.value).collect();
            median(&values).map(|value| (code.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::collect;
    use kurs_market_data::{CurrencyCode, ProviderOutput};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn output(provider: &'static str, rates: &[(&str, Decimal)]) -> ProviderOutput {
        let rates: BTreeMap<CurrencyCode, Decimal> = rates
            .iter()
            .map(|(code, value)| (CurrencyCode::from(*code), *value))
            .collect();
        ProviderOutput::new(provider, CurrencyCode::from("CHF"), rates)
    }

    #[test]
    fn test_median_per_currency() {
        let outputs = vec![
            output("a", &[("USD", dec!(1.0)), ("EUR", dec!(0.9))]),
            output("b", &[("USD", dec!(1.2)), ("EUR", dec!(0.95))]),
            output("c", &[("USD", dec!(1.1))]),
        ];

        let table = consensus(&collect(&outputs));

        assert_eq!(table.get("USD"), Some(dec!(1.1)));
        assert_eq!(table.get("EUR"), Some(dec!(0.925)));
    }

    #[test]
    fn test_no_observations_means_no_entry() {
        let table = consensus(&ObservationSet::new());
        assert!(table.is_empty());
        assert!(!table.contains("USD"));
    }
}
