//! Kurs Core
//!
//! Turns the normalized outputs of many rate providers into one published
//! consensus table:
//!
//! ```text
//! ProviderOutput* -> collect -> ObservationSet -> consensus -> ConsensusTable
//!                                     |                            |
//!                                     +--> audits (diagnostics) <--+
//!                                                  |
//!                                                  v
//!                                        assemble -> write
//! ```
//!
//! Everything up to `assemble` is pure. File access is limited to the
//! catalog loader, the [`snapshots::SnapshotStore`] and the
//! [`publish::PublicationWriter`].

pub mod audit;
pub mod catalog;
pub mod consensus;
pub mod constants;
pub mod errors;
pub mod pipeline;
pub mod publish;
pub mod snapshots;

pub use errors::Error;
pub use errors::Result;
