//! Shared HTTP plumbing for provider adapters.

use std::str::FromStr;
use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::MarketDataError;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("kurs/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client used by an adapter.
pub(crate) fn client() -> Client {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Send a request and return the body of a successful response.
///
/// Non-success statuses are errors: 429 is reported as rate limiting so the
/// registry can back off, everything else as a provider error. Transport
/// failures keep the underlying `reqwest::Error` so connect errors are retried.
pub(crate) async fn fetch_text(
    provider: &str,
    request: RequestBuilder,
) -> Result<String, MarketDataError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            MarketDataError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            debug!("{} request failed: {}", provider, e);
            MarketDataError::Network(e)
        }
    })?;

    let status = response.status();
    debug!("{} responded with {}", provider, status);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketDataError::RateLimited {
            provider: provider.to_string(),
        });
    }

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {} - check the configured credentials", status),
        });
    }

    if !status.is_success() {
        return Err(MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("HTTP {}", status),
        });
    }

    response
        .text()
        .await
        .map_err(|e| MarketDataError::ProviderError {
            provider: provider.to_string(),
            message: format!("Failed to read response: {}", e),
        })
}

/// Send a request and decode a successful JSON response.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, MarketDataError> {
    let body = fetch_text(provider, request).await?;
    parse_json(provider, &body)
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    provider: &str,
    body: &str,
) -> Result<T, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::parse(provider, e.to_string()))
}

/// Numeric coercion for JSON floats. NaN and infinities yield `None`.
pub(crate) fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::try_from(value).ok())
}

/// Numeric coercion for quoted numbers ("0.0000123", "1.2e-5").
pub(crate) fn decimal_from_str(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .ok()
        .or_else(|| Decimal::from_scientific(value).ok())
}

/// Numeric coercion for JSON values that may be numbers or quoted numbers.
pub(crate) fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => n.as_f64().and_then(decimal_from_f64),
        Value::String(s) => decimal_from_str(s),
        _ => None,
    }
}

/// Address of a local port with nothing listening on it.
#[cfg(test)]
pub(crate) fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/", port)
}
