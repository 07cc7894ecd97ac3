use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use super::publish_model::Publication;
use crate::constants::{DATE_FORMAT, META_FILE, RATES_FILE};
use crate::errors::{Error, Result};

/// Files written by one publication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedPaths {
    pub dated_rates: PathBuf,
    pub latest_rates: PathBuf,
    pub meta: PathBuf,
}

/// Writes publications under a public root:
///
/// ```text
/// {root}/{YYYY-MM-DD}/rates.json   pretty
/// {root}/rates.json                pretty, latest
/// {root}/meta.json                 compact
/// ```
#[derive(Clone, Debug)]
pub struct PublicationWriter {
    root: PathBuf,
}

impl PublicationWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn write(&self, publication: &Publication) -> Result<PublishedPaths> {
        let dated_dir = self
            .root
            .join(publication.meta.date.format(DATE_FORMAT).to_string());
        fs::create_dir_all(&dated_dir).map_err(|e| Error::io(&dated_dir, e))?;

        let rates = serde_json::to_string_pretty(&publication.rates)?;
        let paths = PublishedPaths {
            dated_rates: dated_dir.join(RATES_FILE),
            latest_rates: self.root.join(RATES_FILE),
            meta: self.root.join(META_FILE),
        };

        write_file(&paths.dated_rates, &rates)?;
        write_file(&paths.latest_rates, &rates)?;
        write_json(&paths.meta, &publication.meta)?;

        info!(
            "Published {} rates for {} to {}",
            publication.rates.len(),
            publication.meta.date,
            self.root.display()
        );
        Ok(paths)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    write_file(path, &text)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}
