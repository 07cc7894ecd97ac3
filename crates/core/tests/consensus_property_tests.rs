//! Property-based tests for collection, consensus and auditing.
//!
//! Rates are generated as positive decimals with up to six fractional digits,
//! in the range real provider outputs fall into.

use std::collections::BTreeMap;

use kurs_core::audit::{check_completeness, check_deviations, Diagnostic};
use kurs_core::consensus::{collect, consensus, median};
use kurs_market_data::{CurrencyCode, ProviderOutput};
use proptest::prelude::*;
use rust_decimal::Decimal;

// =============================================================================
// Generators
// =============================================================================

fn arb_rate() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000_000, 0u32..=6).prop_map(|(mantissa, scale)| Decimal::new(mantissa, scale))
}

fn arb_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("USD".to_string()),
        Just("EUR".to_string()),
        Just("GBP".to_string()),
        Just("JPY".to_string()),
        Just("BTC".to_string()),
        Just("ETH".to_string()),
    ]
}

fn arb_output(index: usize) -> impl Strategy<Value = ProviderOutput> {
    proptest::collection::btree_map(arb_code(), arb_rate(), 0..6).prop_map(move |rates| {
        let rates: BTreeMap<CurrencyCode, Decimal> = rates
            .into_iter()
            .map(|(code, rate)| (CurrencyCode::from(code), rate))
            .collect();
        ProviderOutput::new(format!("provider_{}", index), CurrencyCode::from("CHF"), rates)
    })
}

fn arb_outputs() -> impl Strategy<Value = Vec<ProviderOutput>> {
    (1usize..6).prop_flat_map(|count| (0..count).map(arb_output).collect::<Vec<_>>())
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The median lies between the smallest and the largest value.
    #[test]
    fn prop_median_is_bounded(values in proptest::collection::vec(arb_rate(), 1..20)) {
        let m = median(&values).unwrap();
        let min = values.iter().min().unwrap();
        let max = values.iter().max().unwrap();
        prop_assert!(*min <= m && m <= *max);
    }

    /// The median does not depend on the order of its input.
    #[test]
    fn prop_median_ignores_order(values in proptest::collection::vec(arb_rate(), 1..20)) {
        let mut reversed = values.clone();
        reversed.reverse();
        let mut sorted = values.clone();
        sorted.sort();
        prop_assert_eq!(median(&values), median(&reversed));
        prop_assert_eq!(median(&values), median(&sorted));
    }

    /// Permuting provider outputs yields the same consensus table.
    #[test]
    fn prop_consensus_ignores_provider_order(outputs in arb_outputs()) {
        let mut reversed = outputs.clone();
        reversed.reverse();

        let forward = consensus(&collect(&outputs));
        let backward = consensus(&collect(&reversed));
        prop_assert_eq!(forward, backward);
    }

    /// A code is in the table exactly when some provider reported it.
    #[test]
    fn prop_table_keys_match_observed_codes(outputs in arb_outputs()) {
        let observations = collect(&outputs);
        let table = consensus(&observations);

        let reported: Vec<&CurrencyCode> = {
            let mut codes: Vec<&CurrencyCode> = outputs.iter().flat_map(|o| o.rates.keys()).collect();
            codes.sort();
            codes.dedup();
            codes
        };
        let published: Vec<&CurrencyCode> = table.iter().map(|(code, _)| code).collect();
        prop_assert_eq!(reported, published);
        prop_assert!(table.iter().all(|(_, value)| *value > Decimal::ZERO));
    }

    /// Every flagged observation is strictly beyond the threshold.
    #[test]
    fn prop_deviations_exceed_threshold(outputs in arb_outputs()) {
        let observations = collect(&outputs);
        let table = consensus(&observations);
        let threshold = Decimal::new(10, 2);

        for diagnostic in check_deviations(&observations, &table, threshold) {
            match diagnostic {
                Diagnostic::Deviation { code, value, consensus, .. } => {
                    prop_assert_eq!(table.get(code.as_str()), Some(consensus));
                    prop_assert!((value - consensus).abs() / consensus > threshold);
                }
                Diagnostic::Missing { .. } => prop_assert!(false, "unexpected missing finding"),
            }
        }
    }

    /// Completeness findings are exactly the expected codes absent from the table.
    #[test]
    fn prop_completeness_reports_absent_codes(outputs in arb_outputs()) {
        let table = consensus(&collect(&outputs));
        let expected: Vec<CurrencyCode> = ["BTC", "ETH", "EUR", "GBP", "JPY", "USD"]
            .into_iter()
            .map(CurrencyCode::from)
            .collect();

        let missing: Vec<CurrencyCode> = check_completeness(&expected, &table)
            .iter()
            .map(|d| d.code().clone())
            .collect();
        let absent: Vec<CurrencyCode> = expected
            .iter()
            .filter(|code| table.get(code.as_str()).is_none())
            .cloned()
            .collect();
        prop_assert_eq!(missing, absent);
    }
}
