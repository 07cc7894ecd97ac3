//! Per-provider bookkeeping for a fan-out fetch.

use std::fmt;

use crate::models::ProviderId;

/// Why a provider sat out a fetch without being contacted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// None of the tracked currencies match the provider's currency kinds.
    NoTrackedCurrencies,

    /// Circuit breaker is open for this provider.
    CircuitBreakerOpen,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTrackedCurrencies => f.write_str("no tracked currencies"),
            Self::CircuitBreakerOpen => f.write_str("circuit open"),
        }
    }
}

/// Outcome of one provider within a fetch.
#[derive(Clone, Debug)]
pub struct ProviderAttempt {
    pub provider_id: ProviderId,
    pub skipped: Option<SkipReason>,
    pub error: Option<String>,
    /// Number of rates kept after validation.
    pub rates: usize,
}

impl ProviderAttempt {
    pub fn succeeded(&self) -> bool {
        self.skipped.is_none() && self.error.is_none()
    }
}

/// Attempts in registration order.
#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<ProviderAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skip(&mut self, provider_id: ProviderId, reason: SkipReason) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            skipped: Some(reason),
            error: None,
            rates: 0,
        });
    }

    pub fn record_error(&mut self, provider_id: ProviderId, error: String) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            skipped: None,
            error: Some(error),
            rates: 0,
        });
    }

    pub fn record_success(&mut self, provider_id: ProviderId, rates: usize) {
        self.attempts.push(ProviderAttempt {
            provider_id,
            skipped: None,
            error: None,
            rates,
        });
    }

    /// One line per run, e.g. `ecb: 30 rates, nbp: ERROR (Timeout: nbp)`.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| match (&a.skipped, &a.error) {
                (Some(reason), _) => format!("{}: SKIPPED ({})", a.provider_id, reason),
                (None, Some(err)) => format!("{}: ERROR ({})", a.provider_id, err),
                (None, None) => format!("{}: {} rates", a.provider_id, a.rates),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn succeeded(&self) -> usize {
        self.attempts.iter().filter(|a| a.succeeded()).count()
    }

    pub fn has_success(&self) -> bool {
        self.attempts.iter().any(ProviderAttempt::succeeded)
    }

    pub fn skip_reasons(&self) -> Vec<(&ProviderId, &SkipReason)> {
        self.attempts
            .iter()
            .filter_map(|a| a.skipped.as_ref().map(|s| (&a.provider_id, s)))
            .collect()
    }

    pub fn errors(&self) -> Vec<(&ProviderId, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| a.error.as_deref().map(|e| (&a.provider_id, e)))
            .collect()
    }
}
