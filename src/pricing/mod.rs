//! Delivery pricing: the exchange-rate port and the price calculator.

pub mod calculator;
pub mod exchange;

pub use calculator::{DeliveryPricing, PricingError, delivery_price};
pub use exchange::{ExchangeRateError, ExchangeRateSource, parse_quote};
