//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all provider operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

use crate::conversion::ConversionError;

/// Errors that can occur while fetching and normalizing provider rates.
///
/// Each variant is classified into a [`RetryClass`] via the [`retry_class`](Self::retry_class)
/// method, which determines how the provider registry should handle the error.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The payload lacks the base currency's quote that the conversion needs
    /// as a divisor. Never produces a partial or poisoned output.
    #[error("Missing pivot rate: {provider} has no usable {currency} quote")]
    MissingPivotRate {
        /// The provider whose payload was incomplete
        provider: String,
        /// The currency whose quote was required
        currency: String,
    },

    /// The provider needs credentials that are not configured.
    #[error("Missing credentials for {provider}: {variables}")]
    MissingCredentials {
        /// The provider that needs credentials
        provider: String,
        /// The environment variables that were not set
        variables: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred (non-success status, API error flag).
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The payload could not be parsed.
    #[error("Parse error: {provider} - {message}")]
    ParseError {
        /// The provider whose payload was malformed
        provider: String,
        /// What went wrong
        message: String,
    },

    /// The provider answered but none of its rates survived normalization.
    #[error("No usable rates from {provider}")]
    NoUsableRates {
        /// The provider with an empty result
        provider: String,
    },

    /// The circuit breaker is open for this provider.
    #[error("Circuit open: {provider}")]
    CircuitOpen {
        /// The provider with an open circuit
        provider: String,
    },

    /// No provider with this id is registered.
    #[error("Provider not found: {provider}")]
    ProviderNotFound {
        /// The requested provider id
        provider: String,
    },

    /// The normalized output violated the provider contract.
    #[error("Validation failed: {message}")]
    ValidationFailed {
        /// Description of the validation failure
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Wrap a conversion failure with the provider that hit it.
    pub fn conversion(provider: &str, error: ConversionError) -> Self {
        match error {
            ConversionError::MissingPivot { currency } => Self::MissingPivotRate {
                provider: provider.to_string(),
                currency: currency.to_string(),
            },
        }
    }

    /// Shorthand for a payload that failed to parse.
    pub fn parse(provider: &str, message: impl Into<String>) -> Self {
        Self::ParseError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Returns the retry classification for this error.
    ///
    /// - [`RetryClass::Never`]: Don't retry, the provider sits this run out
    /// - [`RetryClass::FailoverWithPenalty`]: Retry with backoff, count against the circuit
    /// - [`RetryClass::CircuitOpen`]: Provider circuit is open, skip it
    ///
    /// # Examples
    ///
    /// ```
    /// use kurs_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited { provider: "coingecko".to_string() };
    /// assert_eq!(error.retry_class(), RetryClass::FailoverWithPenalty);
    ///
    /// let error = MarketDataError::MissingPivotRate {
    ///     provider: "ecb".to_string(),
    ///     currency: "CHF".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Terminal for this run - retrying returns the same payload
            Self::MissingPivotRate { .. }
            | Self::MissingCredentials { .. }
            | Self::ProviderError { .. }
            | Self::ParseError { .. }
            | Self::NoUsableRates { .. }
            | Self::ProviderNotFound { .. }
            | Self::ValidationFailed { .. } => RetryClass::Never,

            // Transient errors - retry with backoff
            Self::RateLimited { .. } | Self::Timeout { .. } => RetryClass::FailoverWithPenalty,

            Self::Network(e) if e.is_timeout() || e.is_connect() => {
                RetryClass::FailoverWithPenalty
            }
            Self::Network(_) => RetryClass::Never,

            // Circuit breaker open
            Self::CircuitOpen { .. } => RetryClass::CircuitOpen,
        }
    }
}
