use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use log::{info, warn};
use rust_decimal::Decimal;

use super::pipeline_model::{Aggregation, FetchReport, PipelineConfig, PublishReport};
use super::pipeline_traits::RatesServiceTrait;
use crate::audit::{check_completeness, check_deviations};
use crate::catalog::CurrencyCatalog;
use crate::consensus::{collect, consensus};
use crate::constants::DATE_FORMAT;
use crate::errors::{Error, Result};
use crate::publish::{assemble, PublicationWriter};
use crate::snapshots::SnapshotStore;
use kurs_market_data::{
    CurrencyCode, FetchDiagnostics, MarketDataError, ProviderId, ProviderOutput, ProviderRegistry,
};

/// Collect, combine and audit provider outputs. Pure; never fails.
pub fn aggregate(
    outputs: &[ProviderOutput],
    expected: &[CurrencyCode],
    deviation_threshold: Decimal,
) -> Aggregation {
    let observations = collect(outputs);
    let consensus = consensus(&observations);

    let mut diagnostics = check_deviations(&observations, &consensus, deviation_threshold);
    diagnostics.extend(check_completeness(expected, &consensus));

    Aggregation {
        observations,
        consensus,
        diagnostics,
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

pub struct RatesService {
    registry: Arc<ProviderRegistry>,
    catalog: CurrencyCatalog,
    snapshots: SnapshotStore,
    writer: PublicationWriter,
    config: PipelineConfig,
}

impl RatesService {
    pub fn new(
        registry: Arc<ProviderRegistry>,
        catalog: CurrencyCatalog,
        snapshots: SnapshotStore,
        writer: PublicationWriter,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            catalog,
            snapshots,
            writer,
            config,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    async fn fetch_selected(&self, provider_ids: &[String]) -> Result<FetchReport> {
        if let Some(unknown) = provider_ids
            .iter()
            .find(|id| self.registry.find(id).is_none())
        {
            return Err(MarketDataError::ProviderNotFound {
                provider: unknown.clone(),
            }
            .into());
        }

        let tracked = self.catalog.tracked();
        let results = join_all(
            provider_ids
                .iter()
                .map(|id| self.registry.fetch_one(id, &self.config.base, &tracked)),
        )
        .await;

        let mut report = FetchReport::default();
        for (id, result) in provider_ids.iter().zip(results) {
            let provider_id: ProviderId = Cow::Owned(id.clone());
            match result {
                Ok(output) => {
                    report.diagnostics.record_success(provider_id, output.len());
                    report.outputs.push(output);
                }
                Err(err) => {
                    warn!("Provider '{}' failed: {}", id, err);
                    report.diagnostics.record_error(provider_id, err.to_string());
                }
            }
        }
        Ok(report)
    }

    fn store(&self, report: &mut FetchReport) {
        for output in &report.outputs {
            match self.snapshots.save(output) {
                Ok(path) => report.snapshots.push(path),
                Err(e) => warn!("Could not store snapshot of {}: {}", output.provider, e),
            }
        }
    }

    fn publish_outputs(&self, date: NaiveDate, outputs: &[ProviderOutput]) -> Result<PublishReport> {
        let usable: Vec<ProviderOutput> = outputs
            .iter()
            .filter(|output| {
                if output.base != self.config.base {
                    warn!(
                        "Ignoring {} snapshot against {} (publishing against {})",
                        output.provider, output.base, self.config.base
                    );
                    return false;
                }
                true
            })
            .cloned()
            .collect();

        let expected = self.catalog.expected_codes();
        let aggregation = aggregate(&usable, &expected, self.config.deviation_threshold);
        if aggregation.consensus.is_empty() {
            return Err(Error::NothingToPublish(date));
        }

        for diagnostic in &aggregation.diagnostics {
            warn!("{}", diagnostic);
        }

        let publication = assemble(
            date,
            &aggregation.consensus,
            &aggregation.observations,
            self.catalog.names(),
        );
        let paths = self.writer.write(&publication)?;

        info!(
            "{}: {} of {} expected rates from {} providers, {} diagnostics",
            date,
            publication.rates.len(),
            expected.len(),
            usable.len(),
            aggregation.diagnostics.len()
        );

        Ok(PublishReport {
            date,
            rates: publication.rates.len(),
            providers: usable.len(),
            diagnostics: aggregation.diagnostics,
            paths,
        })
    }
}

#[async_trait]
impl RatesServiceTrait for RatesService {
    async fn fetch(&self, provider_ids: &[String]) -> Result<FetchReport> {
        let mut report = if provider_ids.is_empty() {
            let outcome = self
                .registry
                .fetch_all(&self.config.base, &self.catalog.tracked())
                .await;
            FetchReport {
                outputs: outcome.outputs,
                diagnostics: outcome.diagnostics,
                snapshots: Vec::new(),
            }
        } else {
            self.fetch_selected(provider_ids).await?
        };

        self.store(&mut report);
        Ok(report)
    }

    fn publish(&self, date: NaiveDate) -> Result<PublishReport> {
        let outputs = self.snapshots.load_day(date)?;
        info!("Loaded {} provider snapshots for {}", outputs.len(), date);
        self.publish_outputs(date, &outputs)
    }

    async fn run(&self) -> Result<PublishReport> {
        let date = Utc::now().date_naive();
        let report = self.fetch(&[]).await?;
        log_fetch(&report.diagnostics);
        self.publish_outputs(date, &report.outputs)
    }
}

fn log_fetch(diagnostics: &FetchDiagnostics) {
    if !diagnostics.has_success() {
        warn!("No provider delivered rates: {}", diagnostics.summary());
    }
}
