//! Provider capabilities.
//!
//! Describes what a rate provider covers so the registry can hand it the
//! right slice of the tracked-currency universe.

use crate::models::CurrencyKind;

/// Describes the capabilities of a rate provider.
#[derive(Clone, Debug)]
pub struct ProviderCapabilities {
    /// Currency kinds this provider quotes (fiat, crypto or both).
    pub currency_kinds: &'static [CurrencyKind],

    /// Whether the provider needs an API key or secret.
    pub requires_credentials: bool,
}

impl ProviderCapabilities {
    pub const fn fiat() -> Self {
        Self {
            currency_kinds: &[CurrencyKind::Fiat],
            requires_credentials: false,
        }
    }

    pub const fn crypto() -> Self {
        Self {
            currency_kinds: &[CurrencyKind::Crypto],
            requires_credentials: false,
        }
    }

    pub const fn fiat_and_crypto() -> Self {
        Self {
            currency_kinds: &[CurrencyKind::Fiat, CurrencyKind::Crypto],
            requires_credentials: false,
        }
    }

    pub fn with_credentials(mut self) -> Self {
        self.requires_credentials = true;
        self
    }
}
