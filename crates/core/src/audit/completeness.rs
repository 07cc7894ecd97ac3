use super::audit_model::Diagnostic;
use crate::consensus::ConsensusTable;
use kurs_market_data::CurrencyCode;

/// One finding per expected code absent from the table, in `expected` order.
pub fn check_completeness<'a>(
    expected: impl IntoIterator<Item = &'a CurrencyCode>,
    consensus: &ConsensusTable,
) -> Vec<Diagnostic> {
    expected
        .into_iter()
        .filter(|code| !consensus.contains(code.as_str()))
        .map(|code| Diagnostic::Missing { code: code.clone() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn codes(list: &[&str]) -> Vec<CurrencyCode> {
        list.iter().map(|c| CurrencyCode::from(*c)).collect()
    }

    #[test]
    fn test_reports_missing_in_expected_order() {
        let table: ConsensusTable = [(CurrencyCode::from("USD"), dec!(1.1))].into_iter().collect();

        let messages: Vec<String> = check_completeness(&codes(&["USD", "EUR", "GBP"]), &table)
            .iter()
            .map(ToString::to_string)
            .collect();

        assert_eq!(messages, vec!["Missing rate for EUR", "Missing rate for GBP"]);
    }

    #[test]
    fn test_complete_table_has_no_findings() {
        let table: ConsensusTable = [(CurrencyCode::from("USD"), dec!(1.1))].into_iter().collect();
        assert!(check_completeness(&codes(&["USD"]), &table).is_empty());
    }
}
