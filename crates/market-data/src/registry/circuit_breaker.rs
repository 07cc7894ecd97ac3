//! Per-provider circuit breaker.
//!
//! A provider that keeps timing out or rate limiting is benched for a while
//! so scheduled runs in the same process stop hammering it. States:
//!
//! - **Closed**: fetches go through.
//! - **Open**: fetches are skipped until the recovery timeout elapses.
//! - **HalfOpen**: the next fetch is a probe; success closes the circuit,
//!   failure reopens it.
//!
//! State lives in memory only. A fresh process starts with every circuit closed.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::models::ProviderId;

/// Consecutive transient failures before the circuit opens.
const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

/// How long an open circuit stays open.
const DEFAULT_RECOVERY_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Successful probes needed to close a half-open circuit.
const DEFAULT_PROBE_SUCCESSES: u32 = 1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half-open",
        };
        f.write_str(label)
    }
}

#[derive(Clone, Debug)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub recovery_timeout: Duration,
    pub probe_successes: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            recovery_timeout: DEFAULT_RECOVERY_TIMEOUT,
            probe_successes: DEFAULT_PROBE_SUCCESSES,
        }
    }
}

#[derive(Debug)]
struct Circuit {
    state: CircuitState,
    failures: u32,
    probe_successes: u32,
    opened_at: Option<Instant>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self {
            state: CircuitState::Closed,
            failures: 0,
            probe_successes: 0,
            opened_at: None,
        }
    }
}

impl Circuit {
    fn close(&mut self) {
        *self = Self::default();
    }

    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.probe_successes = 0;
        self.opened_at = Some(Instant::now());
    }
}

/// Thread-safe circuit breaker keyed by provider id.
pub struct CircuitBreaker {
    circuits: Mutex<HashMap<String, Circuit>>,
    config: CircuitBreakerConfig,
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::with_config(CircuitBreakerConfig::default())
    }

    pub fn with_config(config: CircuitBreakerConfig) -> Self {
        Self {
            circuits: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// A poisoned lock only means a panic mid-update; the counters are still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Circuit>> {
        self.circuits.lock().unwrap_or_else(|poisoned| {
            warn!("Circuit breaker lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Whether a fetch may go out now. Moves an open circuit to half-open once
    /// its recovery timeout has elapsed.
    pub fn is_allowed(&self, provider: &ProviderId) -> bool {
        let mut circuits = self.lock();
        let circuit = circuits.entry(provider.to_string()).or_default();

        match circuit.state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let elapsed = circuit
                    .opened_at
                    .map(|at| at.elapsed() >= self.config.recovery_timeout)
                    .unwrap_or(true);
                if elapsed {
                    info!("Circuit for '{}' is half-open, probing", provider);
                    circuit.state = CircuitState::HalfOpen;
                    circuit.probe_successes = 0;
                }
                elapsed
            }
        }
    }

    pub fn record_success(&self, provider: &ProviderId) {
        let mut circuits = self.lock();
        let circuit = circuits.entry(provider.to_string()).or_default();

        match circuit.state {
            CircuitState::Closed => circuit.failures = 0,
            CircuitState::HalfOpen => {
                circuit.probe_successes += 1;
                if circuit.probe_successes >= self.config.probe_successes {
                    info!("Circuit for '{}' closed after successful probe", provider);
                    circuit.close();
                }
            }
            CircuitState::Open => {
                debug!("Ignoring success for '{}' while its circuit is open", provider);
            }
        }
    }

    /// Count a transient failure. A failed probe reopens immediately.
    pub fn record_failure(&self, provider: &ProviderId) {
        let mut circuits = self.lock();
        let circuit = circuits.entry(provider.to_string()).or_default();
        circuit.failures += 1;

        match circuit.state {
            CircuitState::Closed if circuit.failures >= self.config.failure_threshold => {
                warn!(
                    "Circuit for '{}' opened after {} consecutive failures",
                    provider, circuit.failures
                );
                circuit.open();
            }
            CircuitState::Closed => {
                debug!(
                    "Failure {}/{} for '{}'",
                    circuit.failures, self.config.failure_threshold, provider
                );
            }
            CircuitState::HalfOpen => {
                warn!("Probe for '{}' failed, reopening circuit", provider);
                circuit.open();
            }
            CircuitState::Open => {}
        }
    }

    pub fn state(&self, provider: &ProviderId) -> CircuitState {
        self.lock()
            .get(provider.as_ref())
            .map(|c| c.state)
            .unwrap_or(CircuitState::Closed)
    }

    pub fn failure_count(&self, provider: &ProviderId) -> u32 {
        self.lock()
            .get(provider.as_ref())
            .map(|c| c.failures)
            .unwrap_or(0)
    }

    pub fn reset(&self, provider: &ProviderId) {
        if let Some(circuit) = self.lock().get_mut(provider.as_ref()) {
            info!("Circuit for '{}' reset", provider);
            circuit.close();
        }
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}
