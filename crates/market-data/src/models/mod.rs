//! Market data models
//!
//! This module contains the core data types shared by providers and the registry:
//! - `types` - Identifiers (ProviderId, CurrencyCode) and the CurrencyKind enum
//! - `tracked` - The tracked-currency universe (TrackedCurrencies)
//! - `rates` - Fetch context and normalized provider artifacts (RateRequest, ProviderOutput)

mod rates;
mod tracked;
mod types;

pub use rates::{ProviderOutput, RateRequest};
pub use tracked::TrackedCurrencies;
pub use types::{CurrencyCode, CurrencyKind, ProviderId};
