//! Exchange-rate collaborator port.
//!
//! Quotes come from an external source that may be stale, slow or down.
//! This crate only defines the port; adapters live with the embedding
//! application.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;

/// Failure reported by an [`ExchangeRateSource`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeRateError {
    /// The source could not be reached or refused the request.
    #[error("exchange-rate source unavailable: {0}")]
    Unavailable(String),

    /// The source answered with something that is not a number.
    #[error("malformed exchange quote: {0:?}")]
    Malformed(String),
}

/// Source of live exchange quotes.
#[async_trait]
pub trait ExchangeRateSource: Send + Sync + fmt::Debug {
    /// Returns the current quote for the currency `code` (e.g. `"USD"`).
    ///
    /// # Errors
    ///
    /// Returns an [`ExchangeRateError`] when no numeric quote is available.
    async fn get_currency(&self, code: &str) -> Result<Decimal, ExchangeRateError>;
}

/// Parses a textual quote as returned by most rate feeds.
///
/// Accepts plain (`"1.10"`) and scientific (`"1.1e0"`) notation.
///
/// # Errors
///
/// Returns [`ExchangeRateError::Malformed`] when `raw` is not numeric.
pub fn parse_quote(raw: &str) -> Result<Decimal, ExchangeRateError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| ExchangeRateError::Malformed(raw.to_string()))
}
