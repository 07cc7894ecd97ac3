use rust_decimal::{Decimal, RoundingStrategy};

use super::audit_model::Diagnostic;
use crate::consensus::{ConsensusTable, ObservationSet};

/// Flag every observation whose relative distance from its currency's
/// consensus is strictly greater than `threshold` (0.10 = 10%).
///
/// Flagged observations stay in the consensus. Findings come out in code
/// order, then in observation order. A distance too large for `Decimal` is
/// still flagged, with the percentage saturated at `Decimal::MAX`.
pub fn check_deviations(
    observations: &ObservationSet,
    consensus: &ConsensusTable,
    threshold: Decimal,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (code, list) in observations {
        let Some(median) = consensus.get(code.as_str()) else {
            continue;
        };

        for observation in list {
            let deviation = (observation.value - median)
                .abs()
                .checked_div(median)
                .unwrap_or(Decimal::MAX);
            if deviation <= threshold {
                continue;
            }

            diagnostics.push(Diagnostic::Deviation {
                provider: observation.provider.clone(),
                code: code.clone(),
                deviation_pct: percent(deviation),
                value: observation.value,
                consensus: median,
            });
        }
    }

    diagnostics
}

fn percent(ratio: Decimal) -> Decimal {
    let Some(pct) = ratio.checked_mul(Decimal::ONE_HUNDRED) else {
        return Decimal::MAX;
    };
    let mut pct = pct.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(1);
    pct
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{collect, consensus};
    use crate::constants::DEFAULT_DEVIATION_THRESHOLD;
    use kurs_market_data::{CurrencyCode, ProviderOutput};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn output(provider: &'static str, rates: &[(&str, Decimal)]) -> ProviderOutput {
        let rates: BTreeMap<CurrencyCode, Decimal> = rates
            .iter()
            .map(|(code, value)| (CurrencyCode::from(*code), *value))
            .collect();
        ProviderOutput::new(provider, CurrencyCode::from("CHF"), rates)
    }

    fn audit(outputs: &[ProviderOutput]) -> Vec<Diagnostic> {
        let observations = collect(outputs);
        let table = consensus(&observations);
        check_deviations(&observations, &table, DEFAULT_DEVIATION_THRESHOLD)
    }

    #[test]
    fn test_exactly_ten_percent_is_tolerated() {
        // Median of [9, 10, 11] is 10; 9 and 11 sit exactly on the boundary.
        let outputs = vec![
            output("a", &[("USD", dec!(9))]),
            output("b", &[("USD", dec!(10))]),
            output("c", &[("USD", dec!(11))]),
        ];
        assert!(audit(&outputs).is_empty());
    }

    #[test]
    fn test_outlier_is_reported_with_rounded_percentage() {
        let outputs = vec![
            output("provider_a", &[("USD", dec!(1.0))]),
            output("provider_c", &[("USD", dec!(1.0))]),
            output("provider_b", &[("USD", dec!(1.5))]),
        ];

        let diagnostics = audit(&outputs);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].to_string(),
            "provider_b: USD deviates 50.0% from median (value=1.5, median=1)"
        );
    }

    #[test]
    fn test_flagged_value_stays_in_consensus() {
        let outputs = vec![
            output("a", &[("USD", dec!(1.0))]),
            output("b", &[("USD", dec!(2.0))]),
        ];
        let observations = collect(&outputs);
        let table = consensus(&observations);

        let diagnostics = check_deviations(&observations, &table, DEFAULT_DEVIATION_THRESHOLD);

        assert_eq!(table.get("USD"), Some(dec!(1.5)));
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_emission_order_is_code_then_observation() {
        let outputs = vec![
            output("a", &[("USD", dec!(1)), ("EUR", dec!(1))]),
            output("b", &[("USD", dec!(2)), ("EUR", dec!(2))]),
        ];

        let order: Vec<String> = audit(&outputs)
            .iter()
            .map(|d| match d {
                Diagnostic::Deviation { provider, code, .. } => format!("{}:{}", code, provider),
                Diagnostic::Missing { code } => code.to_string(),
            })
            .collect();

        assert_eq!(order, vec!["EUR:a", "EUR:b", "USD:a", "USD:b"]);
    }

    fn deviation_of(diagnostic: &Diagnostic) -> (&str, Decimal) {
        match diagnostic {
            Diagnostic::Deviation {
                provider,
                deviation_pct,
                ..
            } => (&**provider, *deviation_pct),
            Diagnostic::Missing { code } => panic!("unexpected missing {}", code),
        }
    }

    #[test]
    fn test_huge_outlier_saturates_percentage() {
        // 1e27 is a representable ratio but not as a percentage.
        let outputs = vec![
            output("a", &[("USD", dec!(1))]),
            output("b", &[("USD", dec!(1))]),
            output("c", &[("USD", dec!(1000000000000000000000000000))]),
        ];

        let diagnostics = audit(&outputs);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(deviation_of(&diagnostics[0]), ("c", Decimal::MAX));
    }

    #[test]
    fn test_ratio_overflow_is_still_flagged() {
        let outputs = vec![
            output("a", &[("USD", dec!(0.00000000000000000001))]),
            output("b", &[("USD", dec!(0.00000000000000000001))]),
            output("c", &[("USD", dec!(1000000000000))]),
        ];

        let diagnostics = audit(&outputs);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(deviation_of(&diagnostics[0]), ("c", Decimal::MAX));
    }

    #[test]
    fn test_threshold_is_configurable() {
        let outputs = vec![
            output("a", &[("USD", dec!(1.00))]),
            output("b", &[("USD", dec!(1.00))]),
            output("c", &[("USD", dec!(1.06))]),
        ];
        let observations = collect(&outputs);
        let table = consensus(&observations);

        assert!(check_deviations(&observations, &table, dec!(0.10)).is_empty());
        let strict = check_deviations(&observations, &table, dec!(0.05));
        assert_eq!(strict.len(), 1);
        assert!(matches!(
            &strict[0],
            Diagnostic::Deviation { deviation_pct, .. } if *deviation_pct == dec!(6.0)
        ));
    }
}
