//! Unit conversion from provider quote conventions to base-currency rates.
//!
//! Every provider quotes its rates in one of a handful of native conventions.
//! Each convention is a [`QuoteConvention`] variant whose
//! [`convert`](QuoteConvention::convert) is a pure function over the raw quotes
//! and yields "units of X per one unit of base" for every tracked currency.
//!
//! # Rules shared by all conventions
//!
//! - Quotes are normalized to one unit first (`value / lot`).
//! - The convention's reference currency is priced by an implicit quote of 1
//!   unless the payload lists it.
//! - Currencies outside the requested set are dropped silently.
//! - Zero, negative or overflowing values are skipped, never recorded.
//! - **First occurrence wins.** When a payload lists a currency more than once
//!   (crypto listings repeat tickers across market-cap ranks) only the first
//!   entry counts, both for the emitted rate and for the pivot lookup.
//!   Provider listings are ordered by relevance, so the first entry is the
//!   one meant.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::CurrencyCode;

/// Normalized rates: units of currency per one unit of base.
pub type Rates = BTreeMap<CurrencyCode, Decimal>;

/// Conversion failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The conversion divides by the quote for `currency` and the payload has
    /// no positive quote for it.
    #[error("No usable pivot quote for {currency}")]
    MissingPivot { currency: CurrencyCode },
}

/// A single quote as listed by a provider.
#[derive(Clone, Debug, PartialEq)]
pub struct RawQuote {
    pub code: CurrencyCode,
    /// Quoted value in the provider's native convention.
    pub value: Decimal,
    /// Number of units of `code` the value refers to.
    pub lot: Decimal,
}

impl RawQuote {
    pub fn new(code: impl Into<CurrencyCode>, value: Decimal) -> Self {
        Self::with_lot(code, value, Decimal::ONE)
    }

    /// Quote for a lot, e.g. "100 JPY cost 0.58 CHF".
    pub fn with_lot(code: impl Into<CurrencyCode>, value: Decimal, lot: Decimal) -> Self {
        Self {
            code: code.into(),
            value,
            lot,
        }
    }

    /// Value of a single unit, if well-formed and positive.
    fn per_unit(&self) -> Option<Decimal> {
        if self.lot <= Decimal::ZERO || self.value <= Decimal::ZERO {
            return None;
        }
        self.value.checked_div(self.lot)
    }
}

/// Native quote conventions observed across providers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteConvention {
    /// Amount of `reference` per one unit of X (NBP quotes PLN, Aviasales RUB).
    ///
    /// `rate = quote[base] / quote[X]`; with `reference == base` this is `1 / quote[X]`.
    BaseDenominated { reference: CurrencyCode },

    /// "N units of X cost K units of `reference`" (BAZG, CNB).
    ///
    /// The lot is normalized away and the base-denominated rule applies;
    /// with `reference == base` this is `N / K`.
    LotSized { reference: CurrencyCode },

    /// Already units of X per one unit of base.
    Direct,

    /// Units of X per one unit of `reference` (ECB quotes against EUR,
    /// Open Exchange Rates against USD).
    ///
    /// `rate = quote[X] / quote[base]`.
    ReferenceDenominated { reference: CurrencyCode },

    /// Price of one unit of X in `reference` (crypto market listings).
    ///
    /// `rate = pivot / price`, where the pivot is the amount of `reference`
    /// per one unit of base: 1 when the listing is priced in the base itself,
    /// otherwise supplied by the provider.
    PriceInversion { reference: CurrencyCode },
}

impl QuoteConvention {
    /// Convert raw quotes into base-denominated rates for the requested codes.
    ///
    /// `pivot` is only consulted by [`QuoteConvention::PriceInversion`] with a
    /// reference other than the base; every other convention finds its pivot
    /// among the quotes.
    pub fn convert(
        &self,
        quotes: &[RawQuote],
        base: &CurrencyCode,
        wanted: &BTreeSet<CurrencyCode>,
        pivot: Option<Decimal>,
    ) -> Result<Rates, ConversionError> {
        match self {
            Self::Direct => Ok(emit(quotes, None, wanted, |unit| Some(unit))),

            Self::BaseDenominated { reference } | Self::LotSized { reference } => {
                let pivot = lookup_pivot(quotes, reference, base)?;
                Ok(emit(quotes, Some(reference), wanted, |unit| {
                    pivot.checked_div(unit)
                }))
            }

            Self::ReferenceDenominated { reference } => {
                let pivot = lookup_pivot(quotes, reference, base)?;
                Ok(emit(quotes, Some(reference), wanted, |unit| {
                    unit.checked_div(pivot)
                }))
            }

            Self::PriceInversion { reference } => {
                let pivot = if reference == base {
                    Decimal::ONE
                } else {
                    pivot
                        .filter(|p| *p > Decimal::ZERO)
                        .ok_or_else(|| ConversionError::MissingPivot {
                            currency: reference.clone(),
                        })?
                };
                Ok(emit(quotes, None, wanted, |price| pivot.checked_div(price)))
            }
        }
    }

    /// The currency the provider natively quotes against, if any.
    pub fn reference(&self) -> Option<&CurrencyCode> {
        match self {
            Self::Direct => None,
            Self::BaseDenominated { reference }
            | Self::LotSized { reference }
            | Self::ReferenceDenominated { reference }
            | Self::PriceInversion { reference } => Some(reference),
        }
    }
}

/// Per-unit quote of `base`, taking the first listing and the implicit
/// reference quote of 1 into account.
fn lookup_pivot(
    quotes: &[RawQuote],
    reference: &CurrencyCode,
    base: &CurrencyCode,
) -> Result<Decimal, ConversionError> {
    if base == reference {
        return Ok(first_listing(quotes, base)
            .and_then(RawQuote::per_unit)
            .unwrap_or(Decimal::ONE));
    }

    first_listing(quotes, base)
        .and_then(RawQuote::per_unit)
        .ok_or_else(|| ConversionError::MissingPivot {
            currency: base.clone(),
        })
}

fn first_listing<'a>(quotes: &'a [RawQuote], code: &CurrencyCode) -> Option<&'a RawQuote> {
    quotes.iter().find(|q| &q.code == code)
}

/// Walk the quotes in listing order, keeping the first entry per code, and
/// apply `rule` to each per-unit value.
fn emit<F>(
    quotes: &[RawQuote],
    implicit_reference: Option<&CurrencyCode>,
    wanted: &BTreeSet<CurrencyCode>,
    rule: F,
) -> Rates
where
    F: Fn(Decimal) -> Option<Decimal>,
{
    let implicit = implicit_reference.map(|code| RawQuote::new(code.clone(), Decimal::ONE));
    let listed = quotes.iter().chain(implicit.iter());

    let mut seen: HashSet<&CurrencyCode> = HashSet::with_capacity(quotes.len());
    let mut pairs: Vec<(CurrencyCode, Decimal)> = Vec::with_capacity(wanted.len());

    for quote in listed {
        if !seen.insert(&quote.code) {
            continue;
        }
        if !wanted.contains(&quote.code) {
            continue;
        }
        let rate = quote
            .per_unit()
            .and_then(&rule)
            .filter(|r| *r > Decimal::ZERO);
        if let Some(rate) = rate {
            pairs.push((quote.code.clone(), rate));
        }
    }

    pairs.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn chf() -> CurrencyCode {
        CurrencyCode::from("CHF")
    }

    fn wanted(codes: &[&str]) -> BTreeSet<CurrencyCode> {
        codes.iter().map(|c| CurrencyCode::from(*c)).collect()
    }

    #[test]
    fn test_direct_passes_values_through() {
        let quotes = vec![RawQuote::new("usd", dec!(1.1)), RawQuote::new("EUR", dec!(0.95))];
        let rates = QuoteConvention::Direct
            .convert(&quotes, &chf(), &wanted(&["USD", "EUR"]), None)
            .unwrap();

        assert_eq!(rates.get("USD"), Some(&dec!(1.1)));
        assert_eq!(rates.get("EUR"), Some(&dec!(0.95)));
    }

    #[test]
    fn test_untracked_codes_are_dropped() {
        let quotes = vec![RawQuote::new("USD", dec!(1.1)), RawQuote::new("XYZ", dec!(3))];
        let rates = QuoteConvention::Direct
            .convert(&quotes, &chf(), &wanted(&["USD"]), None)
            .unwrap();

        assert_eq!(rates.len(), 1);
        assert!(!rates.contains_key("XYZ"));
    }

    #[test]
    fn test_non_positive_values_are_skipped() {
        let quotes = vec![
            RawQuote::new("USD", dec!(0)),
            RawQuote::new("EUR", dec!(-1)),
            RawQuote::new("GBP", dec!(0.85)),
        ];
        let rates = QuoteConvention::Direct
            .convert(&quotes, &chf(), &wanted(&["USD", "EUR", "GBP"]), None)
            .unwrap();

        assert_eq!(rates.len(), 1);
        assert_eq!(rates.get("GBP"), Some(&dec!(0.85)));
    }

    #[test]
    fn test_base_denominated_divides_pivot_by_quote() {
        // PLN per unit: 1 CHF = 4.5 PLN, 1 USD = 4.0 PLN
        let reference = CurrencyCode::from("PLN");
        let quotes = vec![RawQuote::new("USD", dec!(4.0)), RawQuote::new("CHF", dec!(4.5))];
        let rates = QuoteConvention::BaseDenominated { reference }
            .convert(&quotes, &chf(), &wanted(&["USD", "CHF", "PLN"]), None)
            .unwrap();

        assert_eq!(rates.get("USD"), Some(&dec!(1.125)));
        assert_eq!(rates.get("CHF"), Some(&dec!(1)));
        // the reference itself: 1 CHF = 4.5 PLN
        assert_eq!(rates.get("PLN"), Some(&dec!(4.5)));
    }

    #[test]
    fn test_base_denominated_against_base_inverts() {
        let quotes = vec![RawQuote::new("USD", dec!(0.8))];
        let rates = QuoteConvention::BaseDenominated { reference: chf() }
            .convert(&quotes, &chf(), &wanted(&["USD"]), None)
            .unwrap();

        assert_eq!(rates.get("USD"), Some(&dec!(1.25)));
    }

    #[test]
    fn test_missing_pivot_is_an_error() {
        let reference = CurrencyCode::from("PLN");
        let quotes = vec![RawQuote::new("USD", dec!(4.0))];
        let err = QuoteConvention::BaseDenominated { reference }
            .convert(&quotes, &chf(), &wanted(&["USD"]), None)
            .unwrap_err();

        assert_eq!(err, ConversionError::MissingPivot { currency: chf() });
    }

    #[test]
    fn test_zero_pivot_is_an_error() {
        let reference = CurrencyCode::from("EUR");
        let quotes = vec![RawQuote::new("CHF", dec!(0)), RawQuote::new("USD", dec!(1.1))];
        let result = QuoteConvention::ReferenceDenominated { reference }.convert(
            &quotes,
            &chf(),
            &wanted(&["USD"]),
            None,
        );

        assert!(matches!(result, Err(ConversionError::MissingPivot { .. })));
    }

    #[test]
    fn test_lot_sized_against_base() {
        // "100 JPY cost 0.5 CHF" -> 200 JPY per CHF
        let quotes = vec![
            RawQuote::with_lot("JPY", dec!(0.5), dec!(100)),
            RawQuote::with_lot("EUR", dec!(0.94), dec!(1)),
        ];
        let rates = QuoteConvention::LotSized { reference: chf() }
            .convert(&quotes, &chf(), &wanted(&["JPY", "EUR"]), None)
            .unwrap();

        assert_eq!(rates.get("JPY"), Some(&dec!(200)));
        assert_eq!(rates.get("EUR").unwrap().round_dp(6), dec!(1.063830));
    }

    #[test]
    fn test_lot_sized_with_foreign_reference() {
        // CZK per lot: 1 CHF = 25 CZK, 100 HUF = 6.5 CZK
        let reference = CurrencyCode::from("CZK");
        let quotes = vec![
            RawQuote::with_lot("CHF", dec!(25), dec!(1)),
            RawQuote::with_lot("HUF", dec!(6.5), dec!(100)),
        ];
        let rates = QuoteConvention::LotSized { reference }
            .convert(&quotes, &chf(), &wanted(&["HUF", "CZK"]), None)
            .unwrap();

        assert_eq!(rates.get("CZK"), Some(&dec!(25)));
        assert_eq!(rates.get("HUF").unwrap().round_dp(6), dec!(384.615385));
    }

    #[test]
    fn test_reference_denominated_divides_by_pivot() {
        // EUR based: 1 EUR = 0.94 CHF, 1 EUR = 1.08 USD
        let reference = CurrencyCode::from("EUR");
        let quotes = vec![RawQuote::new("USD", dec!(1.08)), RawQuote::new("CHF", dec!(0.94))];
        let rates = QuoteConvention::ReferenceDenominated { reference }
            .convert(&quotes, &chf(), &wanted(&["USD", "EUR"]), None)
            .unwrap();

        assert_eq!(rates.get("USD").unwrap().round_dp(6), dec!(1.148936));
        assert_eq!(rates.get("EUR").unwrap().round_dp(6), dec!(1.063830));
    }

    #[test]
    fn test_price_inversion_in_base() {
        let quotes = vec![RawQuote::new("BTC", dec!(50000)), RawQuote::new("ETH", dec!(2500))];
        let rates = QuoteConvention::PriceInversion { reference: chf() }
            .convert(&quotes, &chf(), &wanted(&["BTC", "ETH"]), None)
            .unwrap();

        assert_eq!(rates.get("BTC"), Some(&dec!(0.00002)));
        assert_eq!(rates.get("ETH"), Some(&dec!(0.0004)));
    }

    #[test]
    fn test_price_inversion_with_foreign_pivot() {
        // priced in USD, 1 CHF = 1.25 USD
        let reference = CurrencyCode::from("USD");
        let quotes = vec![RawQuote::new("BTC", dec!(62500))];
        let rates = QuoteConvention::PriceInversion { reference }
            .convert(&quotes, &chf(), &wanted(&["BTC"]), Some(dec!(1.25)))
            .unwrap();

        assert_eq!(rates.get("BTC"), Some(&dec!(0.00002)));
    }

    #[test]
    fn test_price_inversion_requires_foreign_pivot() {
        let reference = CurrencyCode::from("USD");
        let quotes = vec![RawQuote::new("BTC", dec!(62500))];
        let err = QuoteConvention::PriceInversion { reference }
            .convert(&quotes, &chf(), &wanted(&["BTC"]), None)
            .unwrap_err();

        assert_eq!(
            err,
            ConversionError::MissingPivot {
                currency: CurrencyCode::from("USD")
            }
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        // Two listings for the same ticker: the higher ranked one counts.
        let quotes = vec![
            RawQuote::new("BTC", dec!(50000)),
            RawQuote::new("ETH", dec!(2500)),
            RawQuote::new("btc", dec!(1)),
        ];
        let rates = QuoteConvention::PriceInversion { reference: chf() }
            .convert(&quotes, &chf(), &wanted(&["BTC", "ETH"]), None)
            .unwrap();

        assert_eq!(rates.get("BTC"), Some(&dec!(0.00002)));
    }

    #[test]
    fn test_duplicate_with_unusable_first_entry_is_not_replaced() {
        let quotes = vec![RawQuote::new("BTC", dec!(0)), RawQuote::new("BTC", dec!(50000))];
        let rates = QuoteConvention::PriceInversion { reference: chf() }
            .convert(&quotes, &chf(), &wanted(&["BTC"]), None)
            .unwrap();

        assert!(rates.is_empty());
    }

    #[test]
    fn test_pivot_uses_first_listing() {
        let reference = CurrencyCode::from("PLN");
        let quotes = vec![
            RawQuote::new("CHF", dec!(4.5)),
            RawQuote::new("USD", dec!(4.5)),
            RawQuote::new("CHF", dec!(9)),
        ];
        let rates = QuoteConvention::BaseDenominated { reference }
            .convert(&quotes, &chf(), &wanted(&["USD"]), None)
            .unwrap();

        assert_eq!(rates.get("USD"), Some(&dec!(1)));
    }

    #[test]
    fn test_listed_reference_overrides_implicit_quote() {
        // Aviasales lists RUB itself with a value of 1
        let reference = CurrencyCode::from("RUB");
        let quotes = vec![RawQuote::new("RUB", dec!(1)), RawQuote::new("CHF", dec!(100))];
        let rates = QuoteConvention::BaseDenominated { reference }
            .convert(&quotes, &chf(), &wanted(&["RUB"]), None)
            .unwrap();

        assert_eq!(rates.get("RUB"), Some(&dec!(100)));
    }
}
