//! PostgreSQL implementation of the parcel store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::ParcelRow;
use super::{ParcelStore, StoreError};
use crate::config::RegistryConfig;
use crate::domain::{
    DeliveryPriceFilter, NewParcel, Parcel, ParcelId, ParcelQuery, RequestId, UserId,
};

/// Unique index backing request-identifier idempotency.
const REQUEST_ID_CONSTRAINT: &str = "parcels_request_id_key";

/// Expands to the parcel select joined with its type, followed by `$tail`.
macro_rules! select_parcels {
    ($tail:literal) => {
        concat!(
            "SELECT p.id, p.user_id, p.name, p.weight, p.dollar_price, p.delivery_price, \
             p.request_id, p.created_at, t.id AS parcel_type_id, t.name AS parcel_type_name \
             FROM parcels p JOIN parcel_types t ON t.id = p.parcel_type_id",
            $tail
        )
    };
}

/// PostgreSQL-backed parcel store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresParcelStore {
    pool: PgPool,
}

impl PostgresParcelStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the database cannot be reached.
    pub async fn connect(config: &RegistryConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(map_sqlx_error)?;

        tracing::info!(
            max_connections = config.database_max_connections,
            "parcel store connected"
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ParcelStore for PostgresParcelStore {
    async fn find_owned(&self, owner: UserId, id: ParcelId) -> Result<Option<Parcel>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, ParcelRow>(select_parcels!(
            " WHERE p.user_id = $1 AND p.id = $2"
        ))
        .bind(owner.as_uuid())
        .bind(id.as_uuid())
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Parcel::from))
    }

    async fn list_owned(
        &self,
        owner: UserId,
        query: &ParcelQuery,
    ) -> Result<Vec<Parcel>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let mut builder = QueryBuilder::<Postgres>::new(select_parcels!(" WHERE p.user_id = "));
        builder.push_bind(*owner.as_uuid());

        if let Some(parcel_type) = query.parcel_type {
            builder.push(" AND p.parcel_type_id = ");
            builder.push_bind(parcel_type);
        }

        match query.delivery_price {
            DeliveryPriceFilter::Any => {}
            DeliveryPriceFilter::Present => {
                builder.push(" AND p.delivery_price IS NOT NULL");
            }
            DeliveryPriceFilter::Absent => {
                builder.push(" AND p.delivery_price IS NULL");
            }
        }

        builder.push(" ORDER BY p.created_at ASC, p.id ASC OFFSET ");
        builder.push_bind(i64::from(query.offset));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.limit));

        tracing::debug!(%owner, ?query, "listing parcels");

        let rows = builder
            .build_query_as::<ParcelRow>()
            .fetch_all(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Parcel::from).collect())
    }

    async fn find_by_request(&self, request_id: RequestId) -> Result<Option<Parcel>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;

        let row = sqlx::query_as::<_, ParcelRow>(select_parcels!(" WHERE p.request_id = $1"))
            .bind(request_id.as_uuid())
            .fetch_optional(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Parcel::from))
    }

    async fn insert(&self, parcel: NewParcel) -> Result<Parcel, StoreError> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            "INSERT INTO parcels \
             (id, user_id, name, parcel_type_id, weight, dollar_price, delivery_price, \
              request_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(parcel.id.as_uuid())
        .bind(parcel.user_id.as_uuid())
        .bind(&parcel.name)
        .bind(parcel.parcel_type_id)
        .bind(parcel.weight)
        .bind(parcel.dollar_price)
        .bind(parcel.delivery_price)
        .bind(parcel.request_id.as_uuid())
        .bind(parcel.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_insert_error(e, &parcel))?;

        let row = sqlx::query_as::<_, ParcelRow>(select_parcels!(" WHERE p.id = $1"))
            .bind(parcel.id.as_uuid())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Parcel::from(row))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parcels")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(u64::try_from(total).unwrap_or(0))
    }
}

/// Maps a generic sqlx failure to [`StoreError::Backend`].
fn map_sqlx_error(error: sqlx::Error) -> StoreError {
    tracing::debug!(%error, "sqlx operation failed");
    StoreError::Backend(error.to_string())
}

/// Maps an insert failure, recognising constraint violations.
fn map_insert_error(error: sqlx::Error, parcel: &NewParcel) -> StoreError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() && db.constraint() == Some(REQUEST_ID_CONSTRAINT) {
            return StoreError::DuplicateRequest(parcel.request_id);
        }
        if db.is_foreign_key_violation() {
            return StoreError::UnknownParcelType(parcel.parcel_type_id);
        }
    }
    map_sqlx_error(error)
}
