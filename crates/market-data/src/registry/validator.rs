//! Output validation.
//!
//! Every artifact a provider returns is checked before the registry hands it
//! on. Hard failures reject the whole output, soft issues drop single rates:
//!
//! - the output must be denominated in the requested base (hard)
//! - codes that were not requested are dropped (soft)
//! - rates must be strictly positive (soft)
//! - rates above the sanity ceiling are dropped (soft)
//! - an output left without rates is [`MarketDataError::NoUsableRates`]

use log::warn;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{ProviderOutput, RateRequest};

#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Largest plausible "units per base" value. Hyperinflated fiat and
    /// micro-priced tokens stay well below it.
    pub max_rate: Option<Decimal>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_rate: Some(Decimal::from(1_000_000_000_000_000i64)),
        }
    }
}

pub struct RateValidator {
    config: ValidatorConfig,
}

impl RateValidator {
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
        }
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Return the output with offending rates removed.
    pub fn validate(
        &self,
        request: &RateRequest,
        mut output: ProviderOutput,
    ) -> Result<ProviderOutput, MarketDataError> {
        if output.base != request.base {
            return Err(MarketDataError::ValidationFailed {
                message: format!(
                    "{} returned rates against {} instead of {}",
                    output.provider, output.base, request.base
                ),
            });
        }

        let provider = output.provider.clone();
        output.rates.retain(|code, rate| {
            if !request.currencies.contains(code) {
                warn!("{}: dropping unrequested rate for {}", provider, code);
                return false;
            }
            if *rate <= Decimal::ZERO {
                warn!("{}: dropping non-positive rate {} for {}", provider, rate, code);
                return false;
            }
            if let Some(max) = self.config.max_rate {
                if *rate > max {
                    warn!("{}: dropping implausible rate {} for {}", provider, rate, code);
                    return false;
                }
            }
            true
        });

        if output.is_empty() {
            return Err(MarketDataError::NoUsableRates {
                provider: provider.to_string(),
            });
        }
        Ok(output)
    }
}

impl Default for RateValidator {
    fn default() -> Self {
        Self::new()
    }
}
