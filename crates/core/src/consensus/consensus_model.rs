use std::collections::btree_map;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kurs_market_data::{CurrencyCode, ProviderId};

/// One provider's normalized rate for one currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateObservation {
    pub provider: ProviderId,
    /// Units of the currency per one unit of base, always positive
    pub value: Decimal,
}

impl RateObservation {
    pub fn new(provider: impl Into<ProviderId>, value: Decimal) -> Self {
        Self {
            provider: provider.into(),
            value,
        }
    }
}

/// Observations per currency, in the order providers were collected.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObservationSet {
    entries: BTreeMap<CurrencyCode, Vec<RateObservation>>,
}

impl ObservationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, code: CurrencyCode, observation: RateObservation) {
        self.entries.entry(code).or_default().push(observation);
    }

    pub fn get(&self, code: &str) -> Option<&[RateObservation]> {
        self.entries.get(code).map(Vec::as_slice)
    }

    pub fn values(&self, code: &str) -> Vec<Decimal> {
        self.get(code)
            .map(|observations| observations.iter().map(|o| o.value).collect())
            .unwrap_or_default()
    }

    /// Distinct providers behind a currency, sorted.
    pub fn providers_for(&self, code: &str) -> Vec<ProviderId> {
        let mut providers: Vec<ProviderId> = self
            .get(code)
            .map(|observations| observations.iter().map(|o| o.provider.clone()).collect())
            .unwrap_or_default();
        providers.sort();
        providers.dedup();
        providers
    }

    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.entries.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CurrencyCode, Vec<RateObservation>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ObservationSet {
    type Item = (&'a CurrencyCode, &'a Vec<RateObservation>);
    type IntoIter = btree_map::Iter<'a, CurrencyCode, Vec<RateObservation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Consensus value per currency. A code is present only when at least one
/// observation backs it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsensusTable {
    rates: BTreeMap<CurrencyCode, Decimal>,
}

impl ConsensusTable {
    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, CurrencyCode, Decimal> {
        self.rates.iter()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<CurrencyCode, Decimal> {
        &self.rates
    }
}

impl FromIterator<(CurrencyCode, Decimal)> for ConsensusTable {
    fn from_iter<I: IntoIterator<Item = (CurrencyCode, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}
