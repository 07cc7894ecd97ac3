use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kurs_market_data::{CurrencyCode, ProviderId};

/// Code to consensus value, keys in lexicographic order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatesDocument(pub BTreeMap<CurrencyCode, Decimal>);

impl RatesDocument {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Provenance metadata published next to the rates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetaDocument {
    pub date: NaiveDate,
    /// Number of published rates
    pub count: usize,
    /// Display name of every catalog currency
    pub names: BTreeMap<CurrencyCode, String>,
    /// Sorted providers behind each observed currency
    pub providers: BTreeMap<CurrencyCode, Vec<ProviderId>>,
}

/// Everything a run publishes.
#[derive(Clone, Debug, PartialEq)]
pub struct Publication {
    pub rates: RatesDocument,
    pub meta: MetaDocument,
}
