//! Kurs Market Data Crate
//!
//! This crate fetches exchange rates from public and keyed rate providers and
//! normalizes every provider's native quoting convention into one shape:
//! units of currency X per one unit of a configurable base currency.
//!
//! # Overview
//!
//! - Central banks (ECB, BAZG, NBP, CNB), open FX APIs and crypto listings
//! - Pure, testable unit conversion per quoting convention
//! - Concurrent fan-out with per-provider failure isolation
//! - Retry with backoff and circuit breaking for transient failures
//!
//! # Architecture
//!
//! ```text
//! +--------------------+
//! | TrackedCurrencies  |  (fiat + crypto universe)
//! +--------------------+
//!           |
//!           v
//! +--------------------+
//! |  ProviderRegistry  |  (fan-out, retry, circuit breaker, validation)
//! +--------------------+
//!           |
//!           v
//! +--------------------+     +--------------------+
//! |   RateProvider     | --> |  QuoteConvention   |  (raw quotes -> base rates)
//! +--------------------+     +--------------------+
//!           |
//!           v
//! +--------------------+
//! |  ProviderOutput    |  (per-provider artifact)
//! +--------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CurrencyCode`] - Uppercase currency or asset symbol
//! - [`RateRequest`] - Base currency plus the codes a provider is asked for
//! - [`ProviderOutput`] - One provider's normalized rates for one run
//! - [`QuoteConvention`] - How a provider quotes, and how to undo it

pub mod conversion;
pub mod errors;
pub mod models;
pub mod provider;
pub mod registry;

// Re-export all public types from models
pub use models::{
    CurrencyCode, CurrencyKind, ProviderId, ProviderOutput, RateRequest, TrackedCurrencies,
};

pub use conversion::{ConversionError, QuoteConvention, Rates, RawQuote};
pub use errors::{MarketDataError, RetryClass};

// Re-export provider types
pub use provider::aviasales::AviasalesProvider;
pub use provider::bazg::BazgProvider;
pub use provider::cnb::CnbProvider;
pub use provider::coinbase::CoinbaseProvider;
pub use provider::coingecko::CoinGeckoProvider;
pub use provider::coinranking::CoinrankingProvider;
pub use provider::ecb::EcbProvider;
pub use provider::exchangerate::ExchangeRateProvider;
pub use provider::fawazahmed0::Fawazahmed0Provider;
pub use provider::floatrates::FloatRatesProvider;
pub use provider::frankfurter::FrankfurterProvider;
pub use provider::nbp::NbpProvider;
pub use provider::openexchangerates::OpenExchangeRatesProvider;
pub use provider::{ProviderCapabilities, RateProvider};

// Re-export registry types
pub use registry::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, FetchDiagnostics, FetchOutcome,
    ProviderAttempt, ProviderRegistry, RateValidator, RetryPolicy, SkipReason, ValidatorConfig,
};
