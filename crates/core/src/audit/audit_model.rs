use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kurs_market_data::{CurrencyCode, ProviderId};

/// A human-readable audit finding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A provider's value is further from the consensus than the threshold allows.
    #[serde(rename_all = "camelCase")]
    Deviation {
        provider: ProviderId,
        code: CurrencyCode,
        /// Relative distance in percent, one decimal place
        deviation_pct: Decimal,
        value: Decimal,
        consensus: Decimal,
    },

    /// An expected currency has no consensus value.
    Missing { code: CurrencyCode },
}

impl Diagnostic {
    pub fn code(&self) -> &CurrencyCode {
        match self {
            Diagnostic::Deviation { code, .. } | Diagnostic::Missing { code } => code,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Deviation {
                provider,
                code,
                deviation_pct,
                value,
                consensus,
            } => write!(
                f,
                "{}: {} deviates {}% from median (value={}, median={})",
                provider,
                code,
                deviation_pct,
                value.normalize(),
                consensus.normalize()
            ),
            Diagnostic::Missing { code } => write!(f, "Missing rate for {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_deviation_message() {
        let diagnostic = Diagnostic::Deviation {
            provider: "provider_b".into(),
            code: CurrencyCode::from("USD"),
            deviation_pct: dec!(50.0),
            value: dec!(1.50),
            consensus: dec!(1.0),
        };
        assert_eq!(
            diagnostic.to_string(),
            "provider_b: USD deviates 50.0% from median (value=1.5, median=1)"
        );
    }

    #[test]
    fn test_missing_message() {
        let diagnostic = Diagnostic::Missing {
            code: CurrencyCode::from("GBP"),
        };
        assert_eq!(diagnostic.to_string(), "Missing rate for GBP");
        assert_eq!(diagnostic.code().as_str(), "GBP");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let diagnostic = Diagnostic::Missing {
            code: CurrencyCode::from("GBP"),
        };
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["kind"], "missing");
        assert_eq!(json["code"], "GBP");
    }
}
