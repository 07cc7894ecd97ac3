//! Provider registry module.
//!
//! This module provides orchestration for rate providers, including:
//! - Concurrent fan-out across all registered providers
//! - Retry with backoff for transient failures
//! - Circuit breaking for fault tolerance across scheduled runs
//! - Output validation

mod circuit_breaker;
mod registry;
mod retry;
mod skip_reason;
mod validator;

pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use registry::{FetchOutcome, ProviderRegistry};
pub use retry::RetryPolicy;
pub use skip_reason::{FetchDiagnostics, ProviderAttempt, SkipReason};
pub use validator::{RateValidator, ValidatorConfig};
