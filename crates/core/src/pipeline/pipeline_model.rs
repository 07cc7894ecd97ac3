use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::audit::Diagnostic;
use crate::consensus::{ConsensusTable, ObservationSet};
use crate::constants::{DEFAULT_BASE_CURRENCY, DEFAULT_DEVIATION_THRESHOLD};
use crate::publish::PublishedPaths;
use kurs_market_data::{CurrencyCode, FetchDiagnostics, ProviderOutput};

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Currency every published rate is expressed against
    pub base: CurrencyCode,
    /// Relative deviation above which an observation is flagged
    pub deviation_threshold: Decimal,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base: CurrencyCode::from(DEFAULT_BASE_CURRENCY),
            deviation_threshold: DEFAULT_DEVIATION_THRESHOLD,
        }
    }
}

/// Result of collecting, combining and auditing a set of provider outputs.
#[derive(Clone, Debug, Default)]
pub struct Aggregation {
    pub observations: ObservationSet,
    pub consensus: ConsensusTable,
    /// Deviation findings first, then missing currencies
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default)]
pub struct FetchReport {
    pub outputs: Vec<ProviderOutput>,
    pub diagnostics: FetchDiagnostics,
    pub snapshots: Vec<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct PublishReport {
    pub date: NaiveDate,
    /// Number of published rates
    pub rates: usize,
    /// Provider outputs that went into the consensus
    pub providers: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub paths: PublishedPaths,
}

impl PublishReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}
