//! Parcel service: owner-scoped lookups and idempotent registration.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::config::RegistryConfig;
use crate::domain::{NewParcel, Parcel, ParcelDraft, ParcelFilter, ParcelId, RequestId, UserId};
use crate::error::RegistryError;
use crate::persistence::{ParcelStore, StoreError};
use crate::pricing::DeliveryPricing;

/// Orchestration layer for parcel lookups and registration.
///
/// Stateless coordinator over a [`ParcelStore`] and a [`DeliveryPricing`]
/// calculator. Registration follows the pattern: check request id →
/// price → insert → resolve a lost uniqueness race by re-reading.
#[derive(Debug, Clone)]
pub struct ParcelService {
    store: Arc<dyn ParcelStore>,
    pricing: DeliveryPricing,
    default_limit: u32,
    max_limit: u32,
}

impl ParcelService {
    /// Creates a new `ParcelService` with the page-size bounds from `config`.
    #[must_use]
    pub fn new(
        store: Arc<dyn ParcelStore>,
        pricing: DeliveryPricing,
        config: &RegistryConfig,
    ) -> Self {
        Self {
            store,
            pricing,
            default_limit: config.default_limit,
            max_limit: config.max_limit,
        }
    }

    /// Returns a reference to the inner [`ParcelStore`].
    #[must_use]
    pub fn store(&self) -> &Arc<dyn ParcelStore> {
        &self.store
    }

    /// Returns parcel `id` if it belongs to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if the parcel does not exist or
    /// belongs to another user, and [`RegistryError::Store`] if the store
    /// fails.
    pub async fn get_parcel(&self, owner: UserId, id: ParcelId) -> Result<Parcel, RegistryError> {
        self.store
            .find_owned(owner, id)
            .await?
            .ok_or(RegistryError::NotFound(id))
    }

    /// Returns one page of `owner`'s parcels matching `filter`.
    ///
    /// An empty page is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`] if the store fails.
    pub async fn get_parcels(
        &self,
        owner: UserId,
        filter: ParcelFilter,
    ) -> Result<Vec<Parcel>, RegistryError> {
        let query = filter.into_query(self.default_limit, self.max_limit);
        Ok(self.store.list_owned(owner, &query).await?)
    }

    /// Registers a parcel for `owner`, at most once per request identifier.
    ///
    /// Replaying a request identifier returns the stored parcel unchanged,
    /// including its original delivery price.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidDraft`] if a new draft has a blank
    /// name, a non-positive weight or a negative declared value,
    /// [`RegistryError::PricingUnavailable`] if no quote could be
    /// obtained (nothing is stored), [`RegistryError::CreateFailed`] if the
    /// insert fails or the request identifier belongs to another user, and
    /// [`RegistryError::Store`] if the initial lookup fails.
    pub async fn create_parcel(
        &self,
        owner: UserId,
        draft: ParcelDraft,
    ) -> Result<Parcel, RegistryError> {
        if let Some(parcel) = self.check_create_request(owner, draft.request_id).await? {
            return Ok(parcel);
        }
        self.add_new_parcel(owner, draft).await
    }

    /// Computes the delivery price of a parcel from a live quote.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PricingUnavailable`] if the exchange-rate
    /// source fails or the price overflows.
    pub async fn calculate_delivery(&self, parcel: &NewParcel) -> Result<Decimal, RegistryError> {
        self.pricing
            .calculate(parcel.dollar_price, parcel.weight)
            .await
            .map_err(|source| RegistryError::PricingUnavailable { source })
    }

    /// Returns the parcel already registered under `request_id`, if any.
    async fn check_create_request(
        &self,
        owner: UserId,
        request_id: RequestId,
    ) -> Result<Option<Parcel>, RegistryError> {
        let Some(parcel) = self.store.find_by_request(request_id).await? else {
            return Ok(None);
        };
        replayed(owner, request_id, parcel).map(Some)
    }

    async fn add_new_parcel(
        &self,
        owner: UserId,
        draft: ParcelDraft,
    ) -> Result<Parcel, RegistryError> {
        draft.validate()?;
        let request_id = draft.request_id;
        let new_parcel = NewParcel::from_draft(owner, draft);
        let delivery_price = self.calculate_delivery(&new_parcel).await?;
        let new_parcel = new_parcel.with_delivery_price(delivery_price);

        match self.store.insert(new_parcel).await {
            Ok(parcel) => {
                tracing::info!(
                    parcel_id = %parcel.id,
                    %request_id,
                    %delivery_price,
                    "parcel registered"
                );
                Ok(parcel)
            }
            Err(StoreError::DuplicateRequest(_)) => {
                tracing::warn!(%request_id, "lost registration race, returning stored parcel");
                let stored = self.store.find_by_request(request_id).await.map_err(|e| {
                    tracing::error!(error = %e, %request_id, "couldn't reload parcel");
                    RegistryError::CreateFailed { source: e }
                })?;
                match stored {
                    Some(parcel) => replayed(owner, request_id, parcel),
                    None => Err(RegistryError::CreateFailed {
                        source: StoreError::DuplicateRequest(request_id),
                    }),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, %request_id, "couldn't add parcel");
                Err(RegistryError::CreateFailed { source: e })
            }
        }
    }
}

/// Accepts a stored parcel as the answer to a replayed request.
///
/// A request identifier is bound to the user who first used it; another
/// user replaying it is refused without disclosing the stored parcel.
fn replayed(owner: UserId, request_id: RequestId, parcel: Parcel) -> Result<Parcel, RegistryError> {
    if parcel.user_id != owner {
        tracing::warn!(%request_id, %owner, "request identifier replayed by another user");
        return Err(RegistryError::CreateFailed {
            source: StoreError::DuplicateRequest(request_id),
        });
    }
    tracing::info!(%request_id, parcel_id = %parcel.id, "request checked, found saved entity");
    Ok(parcel)
}
