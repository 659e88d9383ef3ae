//! Domain layer: parcel identity, the parcel entity and lookup filters.
//!
//! These types carry no persistence or pricing behaviour; the service
//! layer composes them with a [`crate::persistence::ParcelStore`] and a
//! [`crate::pricing::DeliveryPricing`] calculator.

pub mod filter;
pub mod ids;
pub mod parcel;

pub use filter::{DeliveryPriceFilter, ParcelFilter, ParcelQuery};
pub use ids::{ParcelId, RequestId, UserId};
pub use parcel::{DraftError, NewParcel, Parcel, ParcelDraft, ParcelType};
