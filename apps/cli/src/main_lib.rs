use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, Credentials, LogFormat};
use kurs_core::catalog::load_catalog;
use kurs_core::pipeline::RatesService;
use kurs_core::publish::PublicationWriter;
use kurs_core::snapshots::SnapshotStore;
use kurs_market_data::provider::{coinbase, coinranking, openexchangerates};
use kurs_market_data::{
    AviasalesProvider, BazgProvider, CircuitBreaker, CnbProvider, CoinGeckoProvider,
    CoinbaseProvider, CoinrankingProvider, EcbProvider, ExchangeRateProvider, Fawazahmed0Provider,
    FloatRatesProvider, FrankfurterProvider, NbpProvider, OpenExchangeRatesProvider,
    ProviderRegistry, RateProvider, RateValidator, RetryPolicy,
};

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

/// Every provider that can run with the given credentials, public sources first.
pub fn build_providers(credentials: &Credentials) -> Vec<Arc<dyn RateProvider>> {
    let mut providers: Vec<Arc<dyn RateProvider>> = vec![
        Arc::new(EcbProvider::new()),
        Arc::new(BazgProvider::new()),
        Arc::new(NbpProvider::new()),
        Arc::new(CnbProvider::new()),
        Arc::new(AviasalesProvider::new()),
        Arc::new(FrankfurterProvider::new()),
        Arc::new(ExchangeRateProvider::new()),
        Arc::new(FloatRatesProvider::new()),
        Arc::new(Fawazahmed0Provider::new()),
        Arc::new(CoinGeckoProvider::new()),
    ];

    match &credentials.openexchangerates_app_id {
        Some(app_id) => providers.push(Arc::new(OpenExchangeRatesProvider::new(app_id.clone()))),
        None => tracing::warn!(
            "{} not set, skipping openexchangerates",
            openexchangerates::APP_ID_VAR
        ),
    }

    match &credentials.coinranking_api_key {
        Some(key) => providers.push(Arc::new(CoinrankingProvider::new(key.clone()))),
        None => tracing::warn!("{} not set, skipping coinranking", coinranking::API_KEY_VAR),
    }

    match (&credentials.coinbase_api_key, &credentials.coinbase_api_secret) {
        (Some(key), Some(secret)) => {
            providers.push(Arc::new(CoinbaseProvider::new(key.clone(), secret.clone())))
        }
        _ => tracing::warn!(
            "{} or {} not set, skipping coinbase",
            coinbase::API_KEY_VAR,
            coinbase::API_SECRET_VAR
        ),
    }

    providers
}

pub fn build_registry(config: &Config) -> ProviderRegistry {
    let providers = build_providers(&config.credentials);
    tracing::info!(
        "Registered {} providers: {}",
        providers.len(),
        providers
            .iter()
            .map(|p| p.id())
            .collect::<Vec<_>>()
            .join(", ")
    );

    ProviderRegistry::with_config(
        providers,
        CircuitBreaker::new(),
        RateValidator::new(),
        RetryPolicy::default().with_max_attempts(config.fetch_attempts),
    )
}

pub fn build_service(config: &Config) -> Result<Arc<RatesService>> {
    let catalog = load_catalog(&config.catalog_dir).with_context(|| {
        format!(
            "Failed to load currency catalog from {}",
            config.catalog_dir.display()
        )
    })?;

    Ok(Arc::new(RatesService::new(
        Arc::new(build_registry(config)),
        catalog,
        SnapshotStore::new(&config.output_dir),
        PublicationWriter::new(&config.public_dir),
        config.pipeline(),
    )))
}
