//! Database row models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{Parcel, ParcelId, ParcelType, RequestId, UserId};

/// A `parcels` row joined with its `parcel_types` row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParcelRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Display name.
    pub name: String,
    /// Weight in kilograms.
    pub weight: Decimal,
    /// Declared value in the base currency.
    pub dollar_price: Decimal,
    /// Computed delivery price, `NULL` until priced.
    pub delivery_price: Option<Decimal>,
    /// Idempotency token, unique across the table.
    pub request_id: Uuid,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
    /// Joined `parcel_types.id`.
    pub parcel_type_id: i32,
    /// Joined `parcel_types.name`.
    pub parcel_type_name: String,
}

impl From<ParcelRow> for Parcel {
    fn from(row: ParcelRow) -> Self {
        Self {
            id: ParcelId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            name: row.name,
            parcel_type: ParcelType {
                id: row.parcel_type_id,
                name: row.parcel_type_name,
            },
            weight: row.weight,
            dollar_price: row.dollar_price,
            delivery_price: row.delivery_price,
            request_id: RequestId::from_uuid(row.request_id),
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_parcel() {
        let row = ParcelRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "laptop".to_string(),
            weight: Decimal::new(18, 1),
            dollar_price: Decimal::new(1_299, 0),
            delivery_price: None,
            request_id: Uuid::new_v4(),
            created_at: Utc::now(),
            parcel_type_id: 2,
            parcel_type_name: "electronics".to_string(),
        };
        let parcel = Parcel::from(row.clone());

        assert_eq!(*parcel.id.as_uuid(), row.id);
        assert_eq!(*parcel.request_id.as_uuid(), row.request_id);
        assert_eq!(parcel.parcel_type.name, "electronics");
        assert!(parcel.delivery_price.is_none());
    }
}
