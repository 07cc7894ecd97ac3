use std::collections::BTreeSet;

use super::types::{CurrencyCode, CurrencyKind};

/// The universe of currencies a run is expected to publish.
///
/// Fiat and crypto codes are kept apart so that each provider only receives
/// the kinds it covers. Loaded once at the start of a run, read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackedCurrencies {
    fiat: BTreeSet<CurrencyCode>,
    crypto: BTreeSet<CurrencyCode>,
}

impl TrackedCurrencies {
    pub fn new(
        fiat: impl IntoIterator<Item = CurrencyCode>,
        crypto: impl IntoIterator<Item = CurrencyCode>,
    ) -> Self {
        Self {
            fiat: fiat.into_iter().collect(),
            crypto: crypto.into_iter().collect(),
        }
    }

    pub fn fiat(&self) -> &BTreeSet<CurrencyCode> {
        &self.fiat
    }

    pub fn crypto(&self) -> &BTreeSet<CurrencyCode> {
        &self.crypto
    }

    pub fn contains(&self, code: &CurrencyCode) -> bool {
        self.fiat.contains(code) || self.crypto.contains(code)
    }

    /// Tracked codes of the given kinds, sorted.
    pub fn of_kinds(&self, kinds: &[CurrencyKind]) -> BTreeSet<CurrencyCode> {
        let mut codes = BTreeSet::new();
        for kind in kinds {
            let set = match kind {
                CurrencyKind::Fiat => &self.fiat,
                CurrencyKind::Crypto => &self.crypto,
            };
            codes.extend(set.iter().cloned());
        }
        codes
    }

    /// Union of both sets in lexicographic order.
    pub fn all(&self) -> Vec<CurrencyCode> {
        self.of_kinds(&[CurrencyKind::Fiat, CurrencyKind::Crypto])
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fiat.union(&self.crypto).count()
    }

    pub fn is_empty(&self) -> bool {
        self.fiat.is_empty() && self.crypto.is_empty()
    }
}
