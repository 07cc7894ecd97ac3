use log::{debug, warn};
use rust_decimal::Decimal;

use super::consensus_model::{ObservationSet, RateObservation};
use kurs_market_data::ProviderOutput;

/// Merge provider outputs into per-currency observation lists.
///
/// Outputs without rates are an unavailable provider and contribute nothing.
/// Non-positive values are dropped.
pub fn collect<'a>(outputs: impl IntoIterator<Item = &'a ProviderOutput>) -> ObservationSet {
    let mut observations = ObservationSet::new();

    for output in outputs {
        if output.is_empty() {
            debug!("{}: no rates, skipping", output.provider);
            continue;
        }

        for (code, value) in &output.rates {
            if *value <= Decimal::ZERO {
                warn!(
                    "{}: ignoring non-positive rate {} for {}",
                    output.provider, value, code
                );
                continue;
            }
            observations.push(
                code.clone(),
                RateObservation::new(output.provider.clone(), *value),
            );
        }
    }

    observations
}
