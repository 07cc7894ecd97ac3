//! Provider artifacts live at `{root}/{YYYY-MM-DD}/{provider}.json`, one file
//! per provider and day. A later fetch on the same day replaces the file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, warn};

use crate::constants::DATE_FORMAT;
use crate::errors::{Error, Result};
use kurs_market_data::ProviderOutput;

#[derive(Clone, Debug)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn day_dir(&self, date: NaiveDate) -> PathBuf {
        self.root.join(date.format(DATE_FORMAT).to_string())
    }

    /// Store an output under the day it was fetched.
    pub fn save(&self, output: &ProviderOutput) -> Result<PathBuf> {
        let dir = self.day_dir(output.datetime.date_naive());
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let path = dir.join(format!("{}.json", output.provider));
        let json = serde_json::to_string_pretty(output)?;
        fs::write(&path, json).map_err(|e| Error::io(&path, e))?;

        debug!("Saved {} rates from {} to {}", output.len(), output.provider, path.display());
        Ok(path)
    }

    /// Every artifact of a day, ordered by file name.
    ///
    /// Unreadable or malformed files are skipped with a warning so one bad
    /// artifact does not block publication. A day without a directory is
    /// [`Error::NoSnapshots`].
    pub fn load_day(&self, date: NaiveDate) -> Result<Vec<ProviderOutput>> {
        let dir = self.day_dir(date);
        if !dir.is_dir() {
            return Err(Error::NoSnapshots { date, dir });
        }

        let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut outputs = Vec::with_capacity(paths.len());
        for path in paths {
            match read_output(&path) {
                Ok(output) => outputs.push(output),
                Err(e) => warn!("Skipping snapshot {}: {}", path.display(), e),
            }
        }
        Ok(outputs)
    }
}

fn read_output(path: &Path) -> Result<ProviderOutput> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}
