/// Classification for retry policy.
///
/// Used to determine how the registry should respond to errors from providers.
///
/// # Behavior Summary
///
/// | Class | Retry this provider? | Record Circuit Breaker Failure? |
/// |-------|----------------------|--------------------------------|
/// | `Never` | No | No |
/// | `FailoverWithPenalty` | Yes, with backoff | Yes (affects future runs) |
/// | `CircuitOpen` | No (skip this one) | No (already recorded) |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - malformed payload, missing pivot, bad credentials.
    /// The provider is left out of this run.
    Never,

    /// Retry with backoff and record a circuit breaker penalty.
    ///
    /// Used for transient errors like rate limiting (429) or timeout.
    /// After enough failures the circuit opens and the provider is skipped
    /// by later runs of the same process.
    FailoverWithPenalty,

    /// Circuit breaker is open for this provider.
    /// Skip this provider until the circuit closes.
    CircuitOpen,
}
