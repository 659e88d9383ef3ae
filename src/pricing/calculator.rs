//! Delivery price calculation.
//!
//! `price = (dollar_price * 0.01 + weight * 0.5) * quote`, evaluated in
//! exact decimal arithmetic and left unrounded.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use super::exchange::{ExchangeRateError, ExchangeRateSource};
use crate::config::RegistryConfig;

/// Share of the declared value charged for delivery (1%).
pub const DECLARED_VALUE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Charge per kilogram before conversion (0.5).
pub const PER_KG_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Reasons a delivery price could not be produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// The exchange-rate source failed.
    #[error("quote for {code} failed: {source}")]
    Source {
        /// Currency that was requested.
        code: String,
        /// Failure reported by the source.
        #[source]
        source: ExchangeRateError,
    },

    /// The exchange-rate source did not answer in time.
    #[error("quote for {code} timed out after {timeout:?}")]
    Timeout {
        /// Currency that was requested.
        code: String,
        /// Bound that was exceeded.
        timeout: Duration,
    },

    /// The source returned zero or a negative rate.
    #[error("quote for {code} is not positive: {quote}")]
    NonPositive {
        /// Currency that was requested.
        code: String,
        /// Offending quote.
        quote: Decimal,
    },

    /// The price does not fit in a decimal.
    #[error("delivery price overflowed")]
    Overflow,
}

/// Computes the delivery price from declared value, weight and a quote.
///
/// Returns `None` on decimal overflow.
#[must_use]
pub fn delivery_price(dollar_price: Decimal, weight: Decimal, quote: Decimal) -> Option<Decimal> {
    let value_charge = dollar_price.checked_mul(DECLARED_VALUE_RATE)?;
    let weight_charge = weight.checked_mul(PER_KG_RATE)?;
    value_charge.checked_add(weight_charge)?.checked_mul(quote)
}

/// Prices parcels against a live exchange quote.
///
/// Every calculation fetches a fresh quote, bounded by `timeout`; nothing
/// is cached.
#[derive(Debug, Clone)]
pub struct DeliveryPricing {
    source: Arc<dyn ExchangeRateSource>,
    currency: String,
    timeout: Duration,
}

impl DeliveryPricing {
    /// Creates a calculator quoting `currency` from `source`.
    #[must_use]
    pub fn new(
        source: Arc<dyn ExchangeRateSource>,
        currency: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            currency: currency.into(),
            timeout,
        }
    }

    /// Creates a calculator using the quote currency and timeout from `config`.
    #[must_use]
    pub fn from_config(source: Arc<dyn ExchangeRateSource>, config: &RegistryConfig) -> Self {
        Self::new(
            source,
            config.quote_currency.clone(),
            config.exchange_rate_timeout,
        )
    }

    /// Returns the currency code prices are quoted in.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Fetches the current quote for the configured currency.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the source fails, times out, or
    /// answers with a non-positive rate.
    pub async fn quote(&self) -> Result<Decimal, PricingError> {
        let lookup = self.source.get_currency(&self.currency);
        let quote = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| PricingError::Timeout {
                code: self.currency.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| PricingError::Source {
                code: self.currency.clone(),
                source,
            })?;

        if quote <= Decimal::ZERO {
            return Err(PricingError::NonPositive {
                code: self.currency.clone(),
                quote,
            });
        }
        Ok(quote)
    }

    /// Computes the delivery price for a parcel.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if no quote is available or the result
    /// overflows.
    pub async fn calculate(
        &self,
        dollar_price: Decimal,
        weight: Decimal,
    ) -> Result<Decimal, PricingError> {
        let quote = self.quote().await?;
        let price = delivery_price(dollar_price, weight, quote).ok_or(PricingError::Overflow)?;
        tracing::debug!(
            %dollar_price,
            %weight,
            %quote,
            %price,
            currency = %self.currency,
            "delivery priced"
        );
        Ok(price)
    }
}
