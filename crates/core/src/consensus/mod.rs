//! Consensus module - merging provider outputs and computing one value per currency.

mod collector;
mod consensus_engine;
mod consensus_model;
mod median;

pub use collector::collect;
pub use consensus_engine::consensus;
pub use consensus_model::{ConsensusTable, ObservationSet, RateObservation};
pub use median::median;
