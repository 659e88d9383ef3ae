//! Lookup filters and pagination for bulk parcel queries.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::Parcel;

/// Tri-state filter on whether a parcel has a delivery price.
///
/// Read from an optional boolean: absent or `null` means no filtering,
/// `true` keeps priced parcels, `false` keeps unpriced ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<bool>")]
pub enum DeliveryPriceFilter {
    /// No constraint on the delivery price.
    #[default]
    Any,
    /// Only parcels whose delivery price is set.
    Present,
    /// Only parcels whose delivery price is unset.
    Absent,
}

impl DeliveryPriceFilter {
    /// Returns `true` if a parcel with the given delivery price passes.
    #[must_use]
    pub const fn matches(self, delivery_price: Option<&Decimal>) -> bool {
        match self {
            Self::Any => true,
            Self::Present => delivery_price.is_some(),
            Self::Absent => delivery_price.is_none(),
        }
    }
}

impl From<Option<bool>> for DeliveryPriceFilter {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Any,
            Some(true) => Self::Present,
            Some(false) => Self::Absent,
        }
    }
}

/// Caller-facing filter parameters for listing a user's parcels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParcelFilter {
    /// Restrict to one parcel type.
    pub parcel_type: Option<i32>,
    /// Restrict on delivery price presence.
    #[serde(rename = "with_delivery_price")]
    pub delivery_price: DeliveryPriceFilter,
    /// Number of matching rows to skip.
    pub offset: u32,
    /// Maximum number of rows to return. Defaults to the configured page size.
    pub limit: Option<u32>,
}

impl ParcelFilter {
    /// Resolves the requested page size against the configured bounds.
    ///
    /// A missing limit becomes `default_limit`; any limit is clamped to
    /// `1..=max_limit`.
    #[must_use]
    pub fn into_query(self, default_limit: u32, max_limit: u32) -> ParcelQuery {
        let max_limit = max_limit.max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, max_limit);
        ParcelQuery {
            parcel_type: self.parcel_type,
            delivery_price: self.delivery_price,
            offset: self.offset,
            limit,
        }
    }
}

/// Normalized bulk query handed to a [`crate::persistence::ParcelStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParcelQuery {
    /// Restrict to one parcel type.
    pub parcel_type: Option<i32>,
    /// Restrict on delivery price presence.
    pub delivery_price: DeliveryPriceFilter,
    /// Number of matching rows to skip.
    pub offset: u32,
    /// Maximum number of rows to return, always at least 1.
    pub limit: u32,
}

impl ParcelQuery {
    /// Returns `true` if `parcel` satisfies every filter (pagination aside).
    #[must_use]
    pub fn matches(&self, parcel: &Parcel) -> bool {
        self.parcel_type
            .is_none_or(|type_id| parcel.parcel_type.id == type_id)
            && self.delivery_price.matches(parcel.delivery_price.as_ref())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn delivery_price_filter_from_optional_bool() {
        assert_eq!(DeliveryPriceFilter::from(None), DeliveryPriceFilter::Any);
        assert_eq!(
            DeliveryPriceFilter::from(Some(true)),
            DeliveryPriceFilter::Present
        );
        assert_eq!(
            DeliveryPriceFilter::from(Some(false)),
            DeliveryPriceFilter::Absent
        );
    }

    #[test]
    fn delivery_price_filter_tests_presence_not_value() {
        let zero = Decimal::ZERO;
        assert!(DeliveryPriceFilter::Present.matches(Some(&zero)));
        assert!(!DeliveryPriceFilter::Present.matches(None));
        assert!(DeliveryPriceFilter::Absent.matches(None));
        assert!(!DeliveryPriceFilter::Absent.matches(Some(&zero)));
        assert!(DeliveryPriceFilter::Any.matches(None));
    }

    #[test]
    fn filter_deserializes_from_query_style_json() {
        let json = serde_json::json!({
            "parcel_type": 2,
            "with_delivery_price": false,
            "offset": 10,
        });
        let Ok(filter) = serde_json::from_value::<ParcelFilter>(json) else {
            panic!("filter should deserialize");
        };
        assert_eq!(filter.parcel_type, Some(2));
        assert_eq!(filter.delivery_price, DeliveryPriceFilter::Absent);
        assert_eq!(filter.offset, 10);
        assert_eq!(filter.limit, None);
    }

    #[test]
    fn empty_filter_deserializes_to_defaults() {
        let Ok(filter) = serde_json::from_value::<ParcelFilter>(serde_json::json!({})) else {
            panic!("filter should deserialize");
        };
        assert_eq!(filter, ParcelFilter::default());

        let Ok(filter) =
            serde_json::from_value::<ParcelFilter>(serde_json::json!({"with_delivery_price": null}))
        else {
            panic!("filter should deserialize");
        };
        assert_eq!(filter.delivery_price, DeliveryPriceFilter::Any);
    }

    #[test]
    fn into_query_applies_default_and_clamps() {
        let query = ParcelFilter::default().into_query(20, 100);
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);

        let query = ParcelFilter {
            limit: Some(1_000),
            ..ParcelFilter::default()
        }
        .into_query(20, 100);
        assert_eq!(query.limit, 100);

        let query = ParcelFilter {
            limit: Some(0),
            ..ParcelFilter::default()
        }
        .into_query(20, 100);
        assert_eq!(query.limit, 1);
    }
}
