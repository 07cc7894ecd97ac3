//! Rate provider abstractions and implementations.
//!
//! This module contains:
//! - The `RateProvider` trait that all providers implement
//! - Provider capabilities
//! - Concrete adapters for central banks, public FX APIs and crypto listings
//!
//! # Architecture
//!
//! Adapters are thin: they fetch a payload, extract `RawQuote`s in listing
//! order and delegate every bit of arithmetic to their `QuoteConvention`.
//! Payload extraction lives in a plain `parse` function per adapter so it can
//! be exercised without the network.

mod capabilities;
pub(crate) mod http;
mod traits;

pub mod aviasales;
pub mod bazg;
pub mod cnb;
pub mod coinbase;
pub mod coingecko;
pub mod coinranking;
pub mod ecb;
pub mod exchangerate;
pub mod fawazahmed0;
pub mod floatrates;
pub mod frankfurter;
pub mod nbp;
pub mod openexchangerates;

// Re-exports
pub use capabilities::ProviderCapabilities;
pub use traits::RateProvider;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::conversion::{QuoteConvention, RawQuote};
use crate::errors::MarketDataError;
use crate::models::{ProviderOutput, RateRequest};

/// Apply `convention` to the raw quotes and wrap the result as the provider's artifact.
pub(crate) fn normalize(
    provider: &'static str,
    convention: &QuoteConvention,
    quotes: &[RawQuote],
    request: &RateRequest,
    pivot: Option<Decimal>,
) -> Result<ProviderOutput, MarketDataError> {
    let rates = convention
        .convert(quotes, &request.base, &request.currencies, pivot)
        .map_err(|e| MarketDataError::conversion(provider, e))?;

    log::debug!(
        "{}: {} raw quotes normalized into {} rates",
        provider,
        quotes.len(),
        rates.len()
    );

    Ok(ProviderOutput::new(provider, request.base.clone(), rates))
}

/// Quotes from a `code -> value` object, skipping values that are not numeric.
pub(crate) fn quotes_from_map<I>(entries: I) -> Vec<RawQuote>
where
    I: IntoIterator<Item = (String, Value)>,
{
    entries
        .into_iter()
        .filter_map(|(code, value)| {
            let value = http::decimal_from_value(&value)?;
            Some(RawQuote::new(code, value))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeSet;

    use crate::models::{CurrencyCode, RateRequest};

    pub fn request(base: &str, codes: &[&str]) -> RateRequest {
        let currencies: BTreeSet<CurrencyCode> =
            codes.iter().map(|c| CurrencyCode::from(*c)).collect();
        RateRequest::new(CurrencyCode::from(base), currencies)
    }
}
