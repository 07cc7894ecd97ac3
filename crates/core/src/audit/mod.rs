//! Audit module - advisory diagnostics over a consensus run.
//!
//! Audits never change the consensus table and never fail a run; their
//! findings are returned as an ordered list of [`Diagnostic`]s.

mod audit_model;
mod completeness;
mod deviation;

pub use audit_model::Diagnostic;
pub use completeness::check_completeness;
pub use deviation::check_deviations;
