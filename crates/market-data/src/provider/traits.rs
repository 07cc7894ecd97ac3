//! Rate provider trait definitions.
//!
//! This module defines the core `RateProvider` trait that all
//! rate sources must implement.

use async_trait::async_trait;

use crate::conversion::QuoteConvention;
use crate::errors::MarketDataError;
use crate::models::{CurrencyCode, ProviderOutput, RateRequest};

use super::capabilities::ProviderCapabilities;

/// Trait for exchange-rate providers.
///
/// Implement this trait to add support for a new rate source. An adapter
/// fetches the provider's payload, extracts its raw quotes and hands them to
/// its [`QuoteConvention`], which produces the normalized rates.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use kurs_market_data::provider::{ProviderCapabilities, RateProvider};
///
/// struct MyProvider {
///     client: reqwest::Client,
/// }
///
/// #[async_trait]
/// impl RateProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "my_provider"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities::fiat()
///     }
///
///     fn convention(&self, _base: &CurrencyCode) -> QuoteConvention {
///         QuoteConvention::Direct
///     }
///
///     // ... implement fetch_rates
/// }
/// ```
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// A lowercase constant like "ecb" or "coingecko". Used as the provenance
    /// tag on every rate, as the snapshot file name and for logging.
    fn id(&self) -> &'static str;

    /// Describes which currency kinds this provider covers.
    fn capabilities(&self) -> ProviderCapabilities;

    /// The quote convention used to normalize this provider's payload.
    ///
    /// Fixed per provider; `base` is only needed by providers that quote
    /// directly in whatever currency is requested.
    fn convention(&self, base: &CurrencyCode) -> QuoteConvention;

    /// Fetch and normalize the provider's current rates.
    ///
    /// # Arguments
    ///
    /// * `request` - Base currency and the tracked codes this provider should report
    ///
    /// # Returns
    ///
    /// A [`ProviderOutput`] with only requested, positive rates, or a
    /// `MarketDataError` when the source is unavailable or its payload lacks
    /// the pivot quote.
    async fn fetch_rates(&self, request: &RateRequest) -> Result<ProviderOutput, MarketDataError>;
}
