//! Parcel entity and the payloads used to register one.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ParcelId, RequestId, UserId};

/// Category a parcel is registered under (documents, electronics, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelType {
    /// Parcel type identifier.
    pub id: i32,
    /// Human-readable type name.
    pub name: String,
}

/// A registered parcel, as stored and returned to callers.
///
/// Parcels are written exactly once by the create pipeline and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Unique parcel identifier.
    pub id: ParcelId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name given by the sender.
    pub name: String,
    /// Parcel type, loaded together with the parcel.
    pub parcel_type: ParcelType,
    /// Weight in kilograms.
    pub weight: Decimal,
    /// Declared value in the base currency.
    pub dollar_price: Decimal,
    /// Delivery price computed at registration, if any.
    pub delivery_price: Option<Decimal>,
    /// Idempotency token the parcel was created with.
    pub request_id: RequestId,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied registration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelDraft {
    /// Display name given by the sender.
    pub name: String,
    /// Weight in kilograms.
    pub weight: Decimal,
    /// Identifier of the parcel type.
    pub parcel_type_id: i32,
    /// Declared value in the base currency.
    pub dollar_price: Decimal,
    /// Client-generated idempotency token.
    pub request_id: RequestId,
}

impl ParcelDraft {
    /// Checks the draft before it is priced.
    ///
    /// # Errors
    ///
    /// Returns a [`DraftError`] for a blank name, a weight that is not
    /// positive, or a negative declared value.
    pub fn validate(&self) -> Result<(), DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::EmptyName);
        }
        if self.weight <= Decimal::ZERO {
            return Err(DraftError::NonPositiveWeight(self.weight));
        }
        if self.dollar_price < Decimal::ZERO {
            return Err(DraftError::NegativeDeclaredValue(self.dollar_price));
        }
        Ok(())
    }
}

/// Reasons a registration draft is rejected before pricing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// The parcel name is empty or whitespace.
    #[error("parcel name must not be empty")]
    EmptyName,

    /// Weight is zero or negative.
    #[error("weight must be positive, got {0}")]
    NonPositiveWeight(Decimal),

    /// Declared value is below zero.
    #[error("declared value must not be negative, got {0}")]
    NegativeDeclaredValue(Decimal),
}

/// A fully built parcel row awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParcel {
    /// Identifier assigned to the new row.
    pub id: ParcelId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Identifier of the parcel type.
    pub parcel_type_id: i32,
    /// Weight in kilograms.
    pub weight: Decimal,
    /// Declared value in the base currency.
    pub dollar_price: Decimal,
    /// Computed delivery price.
    pub delivery_price: Option<Decimal>,
    /// Idempotency token.
    pub request_id: RequestId,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewParcel {
    /// Builds an unpriced parcel for `owner` from a registration draft.
    #[must_use]
    pub fn from_draft(owner: UserId, draft: ParcelDraft) -> Self {
        Self {
            id: ParcelId::new(),
            user_id: owner,
            name: draft.name,
            parcel_type_id: draft.parcel_type_id,
            weight: draft.weight,
            dollar_price: draft.dollar_price,
            delivery_price: None,
            request_id: draft.request_id,
            created_at: Utc::now(),
        }
    }

    /// Sets the computed delivery price.
    #[must_use]
    pub fn with_delivery_price(mut self, price: Decimal) -> Self {
        self.delivery_price = Some(price);
        self
    }

    /// Combines this row with its resolved parcel type.
    #[must_use]
    pub fn into_parcel(self, parcel_type: ParcelType) -> Parcel {
        Parcel {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            parcel_type,
            weight: self.weight,
            dollar_price: self.dollar_price,
            delivery_price: self.delivery_price,
            request_id: self.request_id,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn draft() -> ParcelDraft {
        ParcelDraft {
            name: "books".to_string(),
            weight: Decimal::new(25, 1),
            parcel_type_id: 3,
            dollar_price: Decimal::new(4_999, 2),
            request_id: RequestId::from_uuid(uuid::Uuid::new_v4()),
        }
    }

    #[test]
    fn from_draft_starts_unpriced() {
        let owner = UserId::from_uuid(uuid::Uuid::new_v4());
        let draft = draft();
        let row = NewParcel::from_draft(owner, draft.clone());

        assert_eq!(row.user_id, owner);
        assert_eq!(row.request_id, draft.request_id);
        assert_eq!(row.parcel_type_id, 3);
        assert!(row.delivery_price.is_none());
    }

    #[test]
    fn into_parcel_keeps_row_fields() {
        let owner = UserId::from_uuid(uuid::Uuid::new_v4());
        let row = NewParcel::from_draft(owner, draft()).with_delivery_price(Decimal::ONE);
        let id = row.id;
        let parcel = row.into_parcel(ParcelType {
            id: 3,
            name: "documents".to_string(),
        });

        assert_eq!(parcel.id, id);
        assert_eq!(parcel.delivery_price, Some(Decimal::ONE));
        assert_eq!(parcel.parcel_type.name, "documents");
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate(), Ok(()));

        let mut free = draft();
        free.dollar_price = Decimal::ZERO;
        assert_eq!(free.validate(), Ok(()));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut heavy = draft();
        heavy.weight = Decimal::new(-3, 0);
        assert_eq!(
            heavy.validate(),
            Err(DraftError::NonPositiveWeight(Decimal::new(-3, 0)))
        );

        let mut weightless = draft();
        weightless.weight = Decimal::ZERO;
        assert!(matches!(
            weightless.validate(),
            Err(DraftError::NonPositiveWeight(_))
        ));

        let mut refund = draft();
        refund.dollar_price = Decimal::new(-1_000, 0);
        assert_eq!(
            refund.validate(),
            Err(DraftError::NegativeDeclaredValue(Decimal::new(-1_000, 0)))
        );
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut blank = draft();
        blank.name = "   ".to_string();
        assert_eq!(blank.validate(), Err(DraftError::EmptyName));
    }

    #[test]
    fn draft_accepts_string_decimals() {
        let json = serde_json::json!({
            "name": "shoes",
            "weight": "1.5",
            "parcel_type_id": 1,
            "dollar_price": "120.00",
            "request_id": "6f1c2a4e-8d0b-4c6e-9a51-3f2d7b9e0c11",
        });
        let Ok(parsed) = serde_json::from_value::<ParcelDraft>(json) else {
            panic!("draft should deserialize");
        };
        assert_eq!(parsed.weight, Decimal::new(15, 1));
        assert_eq!(parsed.dollar_price, Decimal::new(12_000, 2));
    }
}
