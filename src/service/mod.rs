//! Service layer: business logic orchestration.
//!
//! [`ParcelService`] scopes lookups to their owner, deduplicates
//! registrations by request identifier and prices new parcels through
//! [`crate::pricing::DeliveryPricing`].

pub mod parcel_service;

pub use parcel_service::ParcelService;
