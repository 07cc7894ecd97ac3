//! Pipeline module - fetch, aggregate, audit and publish.

mod pipeline_model;
mod pipeline_service;
mod pipeline_traits;

pub use pipeline_model::{Aggregation, FetchReport, PipelineConfig, PublishReport};
pub use pipeline_service::{aggregate, parse_date, RatesService};
pub use pipeline_traits::RatesServiceTrait;
