//! Core error types for the kurs aggregation pipeline.
//!
//! Adapter failures never surface here during a run: the registry isolates
//! them per provider. What remains are filesystem, catalog and input errors
//! that stop a command outright.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use kurs_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the aggregation pipeline.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid currency catalog: {0}")]
    Catalog(String),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("No provider snapshots for {date} in {}", dir.display())]
    NoSnapshots { date: NaiveDate, dir: PathBuf },

    #[error("No provider delivered rates for {0}, nothing to publish")]
    NothingToPublish(NaiveDate),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
