use async_trait::async_trait;
use chrono::NaiveDate;

use super::pipeline_model::{FetchReport, PublishReport};
use crate::errors::Result;

/// Trait defining the contract for the rate pipeline.
#[async_trait]
pub trait RatesServiceTrait: Send + Sync {
    /// Fetch every provider, or only the given ids, and store their snapshots.
    async fn fetch(&self, provider_ids: &[String]) -> Result<FetchReport>;

    /// Aggregate the stored snapshots of `date` and publish them.
    fn publish(&self, date: NaiveDate) -> Result<PublishReport>;

    /// Fetch every provider and publish today's table from the fresh outputs.
    async fn run(&self) -> Result<PublishReport>;
}
