//! In-memory parcel store.
//!
//! Rows live in a `Vec` behind a [`tokio::sync::RwLock`], so stored order
//! is insertion order. Request-identifier uniqueness is checked under the
//! write lock, which gives the same guarantee as the unique index on the
//! PostgreSQL table.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ParcelStore, StoreError};
use crate::domain::{NewParcel, Parcel, ParcelId, ParcelQuery, ParcelType, RequestId, UserId};

/// Parcel store kept entirely in process memory.
///
/// # Concurrency
///
/// - Lookups take the read lock and may run concurrently.
/// - Inserts are serialized by the write lock.
#[derive(Debug)]
pub struct InMemoryParcelStore {
    parcels: RwLock<Vec<Parcel>>,
    parcel_types: HashMap<i32, ParcelType>,
}

impl InMemoryParcelStore {
    /// Creates an empty store that accepts the given parcel types.
    #[must_use]
    pub fn new(parcel_types: impl IntoIterator<Item = ParcelType>) -> Self {
        Self {
            parcels: RwLock::new(Vec::new()),
            parcel_types: parcel_types
                .into_iter()
                .map(|parcel_type| (parcel_type.id, parcel_type))
                .collect(),
        }
    }
}

#[async_trait]
impl ParcelStore for InMemoryParcelStore {
    async fn find_owned(&self, owner: UserId, id: ParcelId) -> Result<Option<Parcel>, StoreError> {
        let parcels = self.parcels.read().await;
        Ok(parcels
            .iter()
            .find(|parcel| parcel.id == id && parcel.user_id == owner)
            .cloned())
    }

    async fn list_owned(
        &self,
        owner: UserId,
        query: &ParcelQuery,
    ) -> Result<Vec<Parcel>, StoreError> {
        let parcels = self.parcels.read().await;
        Ok(parcels
            .iter()
            .filter(|parcel| parcel.user_id == owner && query.matches(parcel))
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_request(&self, request_id: RequestId) -> Result<Option<Parcel>, StoreError> {
        let parcels = self.parcels.read().await;
        Ok(parcels
            .iter()
            .find(|parcel| parcel.request_id == request_id)
            .cloned())
    }

    async fn insert(&self, parcel: NewParcel) -> Result<Parcel, StoreError> {
        let parcel_type = self
            .parcel_types
            .get(&parcel.parcel_type_id)
            .cloned()
            .ok_or(StoreError::UnknownParcelType(parcel.parcel_type_id))?;

        let mut parcels = self.parcels.write().await;
        if parcels
            .iter()
            .any(|stored| stored.request_id == parcel.request_id)
        {
            return Err(StoreError::DuplicateRequest(parcel.request_id));
        }

        let stored = parcel.into_parcel(parcel_type);
        parcels.push(stored.clone());
        Ok(stored)
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.parcels.read().await.len() as u64)
    }
}
