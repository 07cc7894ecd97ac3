//! Periodic `run` for long-lived deployments.
//!
//! One registry lives for the whole process so the circuit breaker carries
//! provider failures from one run into the next.

use std::sync::Arc;

use kurs_core::pipeline::{RatesService, RatesServiceTrait};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};

/// Run the pipeline every `interval_hours`, starting immediately. Returns on Ctrl-C.
pub async fn run_schedule(service: Arc<RatesService>, interval_hours: u64) {
    let period = period(interval_hours);
    info!("Rate scheduler started ({}-hour interval)", interval_hours.max(1));

    // First tick is immediate, subsequent ticks are `period` apart
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => run_scheduled(&service).await,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, stopping scheduler");
                return;
            }
        }
    }
}

/// Tick period for `interval_hours`, at least one hour.
fn period(interval_hours: u64) -> Duration {
    Duration::from_secs(interval_hours.max(1).saturating_mul(60 * 60))
}

async fn run_scheduled(service: &Arc<RatesService>) {
    info!("Running scheduled rate update...");
    match service.run().await {
        Ok(report) => info!(
            "Scheduled update published {} rates for {} ({} diagnostics)",
            report.rates,
            report.date,
            report.diagnostics.len()
        ),
        Err(e) => warn!("Scheduled rate update failed: {}", e),
    }
}
