//! Persistence layer: the parcel store port and its implementations.
//!
//! [`ParcelStore`] is the transactional store the service runs against.
//! Every call owns its storage handle for the duration of the call only:
//! the PostgreSQL store checks a connection out of the pool (or opens a
//! transaction) and returns it on drop, so early returns and errors
//! release it too.
//!
//! Implementations must reject a second parcel for an already-used
//! request identifier with [`StoreError::DuplicateRequest`]; the service
//! relies on this to stay idempotent under concurrent creates.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{NewParcel, Parcel, ParcelId, ParcelQuery, RequestId, UserId};

pub use memory::InMemoryParcelStore;
pub use postgres::PostgresParcelStore;

/// Failure reported by a [`ParcelStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A parcel with this request identifier already exists.
    #[error("request identifier already used: {0}")]
    DuplicateRequest(RequestId),

    /// The referenced parcel type does not exist.
    #[error("unknown parcel type: {0}")]
    UnknownParcelType(i32),

    /// Connection, query or commit failure.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Transactional storage for parcels.
#[async_trait]
pub trait ParcelStore: Send + Sync + fmt::Debug {
    /// Returns the parcel `id` if it belongs to `owner`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be queried.
    async fn find_owned(&self, owner: UserId, id: ParcelId) -> Result<Option<Parcel>, StoreError>;

    /// Returns one page of `owner`'s parcels matching `query`, in stored
    /// order.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be queried.
    async fn list_owned(
        &self,
        owner: UserId,
        query: &ParcelQuery,
    ) -> Result<Vec<Parcel>, StoreError>;

    /// Returns the parcel created with `request_id`, whoever owns it.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be queried.
    async fn find_by_request(&self, request_id: RequestId) -> Result<Option<Parcel>, StoreError>;

    /// Durably stores a new parcel and returns it with its parcel type.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateRequest`] if the request identifier
    /// is taken, [`StoreError::UnknownParcelType`] for a dangling type
    /// reference, and [`StoreError::Backend`] otherwise.
    async fn insert(&self, parcel: NewParcel) -> Result<Parcel, StoreError>;

    /// Returns the total number of stored parcels.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be queried.
    async fn count(&self) -> Result<u64, StoreError>;
}
