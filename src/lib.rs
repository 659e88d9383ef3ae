//! # parcel-registry
//!
//! Parcel registration and lookup for a delivery application.
//!
//! Parcels are always read through their owner, registration is
//! idempotent per client-supplied request identifier, and every new
//! parcel is priced from a live exchange quote before it is stored.
//!
//! ## Architecture
//!
//! ```text
//! Caller (HTTP layer, worker, ...)
//!     │
//!     ├── ParcelService (service/)
//!     │       ├── DeliveryPricing (pricing/)
//!     │       │       └── ExchangeRateSource (external)
//!     │       │
//!     │       └── ParcelStore (persistence/)
//!     │               ├── PostgresParcelStore
//!     │               └── InMemoryParcelStore
//!     │
//!     └── RegistryError → status code + JSON body
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod pricing;
pub mod service;
