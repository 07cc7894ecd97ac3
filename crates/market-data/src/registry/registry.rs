//! Provider registry: fan-out fetching across all registered providers.
//!
//! For every provider the registry:
//! 1. Narrows the tracked currencies to the provider's currency kinds
//! 2. Checks the circuit breaker
//! 3. Fetches, retrying transient failures with backoff
//! 4. Validates the normalized output
//!
//! Providers run concurrently and fail independently. A provider that fails
//! is recorded in the diagnostics and contributes nothing to the run.

use std::borrow::Cow;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};

use super::{CircuitBreaker, FetchDiagnostics, RateValidator, RetryPolicy, SkipReason};
use crate::errors::{MarketDataError, RetryClass};
use crate::models::{CurrencyCode, ProviderId, ProviderOutput, RateRequest, TrackedCurrencies};
use crate::provider::RateProvider;

/// Artifacts and per-provider diagnostics of one fan-out fetch.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Validated outputs in registration order.
    pub outputs: Vec<ProviderOutput>,
    pub diagnostics: FetchDiagnostics,
}

enum Attempt {
    Skipped(SkipReason),
    Failed(MarketDataError),
    Fetched(ProviderOutput),
}

pub struct ProviderRegistry {
    providers: Vec<Arc<dyn RateProvider>>,
    circuit_breaker: CircuitBreaker,
    validator: RateValidator,
    retry: RetryPolicy,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        Self::with_config(
            providers,
            CircuitBreaker::new(),
            RateValidator::new(),
            RetryPolicy::default(),
        )
    }

    pub fn with_config(
        providers: Vec<Arc<dyn RateProvider>>,
        circuit_breaker: CircuitBreaker,
        validator: RateValidator,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            providers,
            circuit_breaker,
            validator,
            retry,
        }
    }

    pub fn providers(&self) -> &[Arc<dyn RateProvider>] {
        &self.providers
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub fn find(&self, provider_id: &str) -> Option<&Arc<dyn RateProvider>> {
        self.providers.iter().find(|p| p.id() == provider_id)
    }

    /// The slice of the tracked set a provider is asked for, or `None` when
    /// it covers none of the tracked currencies.
    pub fn request_for(
        provider: &dyn RateProvider,
        base: &CurrencyCode,
        tracked: &TrackedCurrencies,
    ) -> Option<RateRequest> {
        let currencies = tracked.of_kinds(provider.capabilities().currency_kinds);
        if currencies.is_empty() {
            return None;
        }
        Some(RateRequest::new(base.clone(), currencies))
    }

    /// Fetch from every registered provider concurrently.
    pub async fn fetch_all(&self, base: &CurrencyCode, tracked: &TrackedCurrencies) -> FetchOutcome {
        info!(
            "Fetching {} tracked currencies against {} from {} providers",
            tracked.len(),
            base,
            self.providers.len()
        );

        let attempts = join_all(
            self.providers
                .iter()
                .map(|provider| self.attempt(provider.as_ref(), base, tracked)),
        )
        .await;

        let mut outcome = FetchOutcome::default();
        for (provider, attempt) in self.providers.iter().zip(attempts) {
            let provider_id: ProviderId = Cow::Borrowed(provider.id());
            match attempt {
                Attempt::Skipped(reason) => {
                    debug!("Skipping '{}': {}", provider_id, reason);
                    outcome.diagnostics.record_skip(provider_id, reason);
                }
                Attempt::Failed(err) => {
                    warn!("Provider '{}' failed: {}", provider_id, err);
                    outcome.diagnostics.record_error(provider_id, err.to_string());
                }
                Attempt::Fetched(output) => {
                    outcome
                        .diagnostics
                        .record_success(provider_id, output.len());
                    outcome.outputs.push(output);
                }
            }
        }

        info!(
            "{} of {} providers delivered: {}",
            outcome.diagnostics.succeeded(),
            self.providers.len(),
            outcome.diagnostics.summary()
        );
        outcome
    }

    /// Fetch from a single provider by id.
    pub async fn fetch_one(
        &self,
        provider_id: &str,
        base: &CurrencyCode,
        tracked: &TrackedCurrencies,
    ) -> Result<ProviderOutput, MarketDataError> {
        let provider = self
            .find(provider_id)
            .ok_or_else(|| MarketDataError::ProviderNotFound {
                provider: provider_id.to_string(),
            })?;

        match self.attempt(provider.as_ref(), base, tracked).await {
            Attempt::Fetched(output) => Ok(output),
            Attempt::Failed(err) => Err(err),
            Attempt::Skipped(SkipReason::CircuitBreakerOpen) => Err(MarketDataError::CircuitOpen {
                provider: provider_id.to_string(),
            }),
            Attempt::Skipped(SkipReason::NoTrackedCurrencies) => {
                Err(MarketDataError::NoUsableRates {
                    provider: provider_id.to_string(),
                })
            }
        }
    }

    async fn attempt(
        &self,
        provider: &dyn RateProvider,
        base: &CurrencyCode,
        tracked: &TrackedCurrencies,
    ) -> Attempt {
        let Some(request) = Self::request_for(provider, base, tracked) else {
            return Attempt::Skipped(SkipReason::NoTrackedCurrencies);
        };

        let provider_id: ProviderId = Cow::Borrowed(provider.id());
        if !self.circuit_breaker.is_allowed(&provider_id) {
            return Attempt::Skipped(SkipReason::CircuitBreakerOpen);
        }

        match self.fetch_with_retry(provider, &request).await {
            Ok(output) => match self.validator.validate(&request, output) {
                Ok(output) => Attempt::Fetched(output),
                Err(err) => Attempt::Failed(err),
            },
            Err(err) => Attempt::Failed(err),
        }
    }

    async fn fetch_with_retry(
        &self,
        provider: &dyn RateProvider,
        request: &RateRequest,
    ) -> Result<ProviderOutput, MarketDataError> {
        let provider_id: ProviderId = Cow::Borrowed(provider.id());
        let mut attempt = 1;

        loop {
            match provider.fetch_rates(request).await {
                Ok(output) => {
                    self.circuit_breaker.record_success(&provider_id);
                    return Ok(output);
                }
                Err(err) => {
                    if err.retry_class() != RetryClass::FailoverWithPenalty {
                        return Err(err);
                    }

                    self.circuit_breaker.record_failure(&provider_id);
                    if attempt >= self.retry.max_attempts
                        || !self.circuit_breaker.is_allowed(&provider_id)
                    {
                        return Err(err);
                    }

                    let delay = self.retry.delay_after(attempt);
                    warn!(
                        "'{}' attempt {}/{} failed ({}), retrying in {:?}",
                        provider_id, attempt, self.retry.max_attempts, err, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    pub fn is_circuit_open(&self, provider_id: &ProviderId) -> bool {
        !self.circuit_breaker.is_allowed(provider_id)
    }

    pub fn reset_circuit(&self, provider_id: &ProviderId) {
        self.circuit_breaker.reset(provider_id);
    }
}
