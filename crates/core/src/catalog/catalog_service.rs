use std::fs;
use std::path::Path;

use log::info;

use super::catalog_model::CurrencyCatalog;
use crate::constants::{CRYPTO_CATALOG_FILE, FIAT_CATALOG_FILE};
use crate::errors::{Error, Result};

/// Load `currencies.json` and `crypto.json` from a catalog directory.
pub fn load_catalog(dir: &Path) -> Result<CurrencyCatalog> {
    let fiat_path = dir.join(FIAT_CATALOG_FILE);
    let crypto_path = dir.join(CRYPTO_CATALOG_FILE);

    let fiat = fs::read_to_string(&fiat_path).map_err(|e| Error::io(&fiat_path, e))?;
    let crypto = fs::read_to_string(&crypto_path).map_err(|e| Error::io(&crypto_path, e))?;

    let catalog = CurrencyCatalog::from_json(&fiat, &crypto)?;
    info!(
        "Loaded currency catalog from {}: {} currencies",
        dir.display(),
        catalog.len()
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FIAT_CATALOG_FILE), r#"{"USD":{"name":"US Dollar"}}"#).unwrap();
        fs::write(dir.path().join(CRYPTO_CATALOG_FILE), r#"{"BTC":{"name":"Bitcoin"}}"#).unwrap();

        let catalog = load_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FIAT_CATALOG_FILE), "{}").unwrap();

        let err = load_catalog(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io { ref path, .. } if path.ends_with(CRYPTO_CATALOG_FILE)));
    }
}
