use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use kurs_market_data::{CurrencyCode, CurrencyKind, TrackedCurrencies};

/// One catalog record. Catalog files may carry more fields; only the name is read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
}

/// The configured fiat and crypto universe.
#[derive(Clone, Debug, Default)]
pub struct CurrencyCatalog {
    fiat: BTreeMap<CurrencyCode, CatalogEntry>,
    crypto: BTreeMap<CurrencyCode, CatalogEntry>,
}

impl CurrencyCatalog {
    /// Build a catalog, rejecting codes listed twice within one set.
    ///
    /// A code listed in both sets is tracked as both kinds and the crypto
    /// entry takes precedence for its name and kind.
    pub fn from_entries(
        fiat: impl IntoIterator<Item = (String, CatalogEntry)>,
        crypto: impl IntoIterator<Item = (String, CatalogEntry)>,
    ) -> Result<Self> {
        let fiat = index(fiat, CurrencyKind::Fiat)?;
        let crypto = index(crypto, CurrencyKind::Crypto)?;

        for code in fiat.keys().filter(|code| crypto.contains_key(*code)) {
            warn!(
                "{} is listed as both fiat and crypto, using the crypto entry '{}'",
                code, crypto[code].name
            );
        }

        Ok(Self { fiat, crypto })
    }

    /// Parse the two catalog documents (`CODE -> { "name": ... }`).
    pub fn from_json(fiat_json: &str, crypto_json: &str) -> Result<Self> {
        let fiat: Vec<(String, CatalogEntry)> = parse_document(fiat_json, CurrencyKind::Fiat)?;
        let crypto: Vec<(String, CatalogEntry)> =
            parse_document(crypto_json, CurrencyKind::Crypto)?;
        Self::from_entries(fiat, crypto)
    }

    /// Tracked-currency set handed to the provider registry.
    pub fn tracked(&self) -> TrackedCurrencies {
        TrackedCurrencies::new(self.fiat.keys().cloned(), self.crypto.keys().cloned())
    }

    /// Every code expected in the published table, sorted.
    pub fn expected_codes(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self
            .fiat
            .keys()
            .chain(self.crypto.keys())
            .cloned()
            .collect();
        codes.sort();
        codes.dedup();
        codes
    }

    /// Code to display name across both sets.
    pub fn names(&self) -> BTreeMap<CurrencyCode, String> {
        // crypto last so it overwrites a fiat entry with the same code
        self.fiat
            .iter()
            .chain(self.crypto.iter())
            .map(|(code, entry)| (code.clone(), entry.name.clone()))
            .collect()
    }

    pub fn kind_of(&self, code: &CurrencyCode) -> Option<CurrencyKind> {
        if self.crypto.contains_key(code) {
            Some(CurrencyKind::Crypto)
        } else if self.fiat.contains_key(code) {
            Some(CurrencyKind::Fiat)
        } else {
            None
        }
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.fiat.len()
            + self
                .crypto
                .keys()
                .filter(|code| !self.fiat.contains_key(*code))
                .count()
    }

    pub fn is_empty(&self) -> bool {
        self.fiat.is_empty() && self.crypto.is_empty()
    }
}

fn kind_label(kind: CurrencyKind) -> &'static str {
    match kind {
        CurrencyKind::Fiat => "fiat",
        CurrencyKind::Crypto => "crypto",
    }
}

// Raw keys stay distinct here so a duplicate after case folding is reported, not merged.
fn parse_document(json: &str, kind: CurrencyKind) -> Result<Vec<(String, CatalogEntry)>> {
    let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
    document
        .into_iter()
        .map(|(code, value)| {
            let entry: CatalogEntry = serde_json::from_value(value).map_err(|e| {
                Error::Catalog(format!("{} entry {}: {}", kind_label(kind), code, e))
            })?;
            Ok((code, entry))
        })
        .collect()
}

fn index(
    entries: impl IntoIterator<Item = (String, CatalogEntry)>,
    kind: CurrencyKind,
) -> Result<BTreeMap<CurrencyCode, CatalogEntry>> {
    let mut indexed = BTreeMap::new();
    for (raw, entry) in entries {
        let code = CurrencyCode::new(&raw);
        if code.as_str().is_empty() {
            return Err(Error::Catalog(format!(
                "empty currency code in {} catalog",
                kind_label(kind)
            )));
        }
        if indexed.insert(code.clone(), entry).is_some() {
            return Err(Error::Catalog(format!(
                "{} is listed twice in the {} catalog",
                code,
                kind_label(kind)
            )));
        }
    }
    Ok(indexed)
}
