//! Shared fixtures for integration tests.
#![allow(dead_code, missing_docs)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parcel_registry::config::RegistryConfig;
use parcel_registry::domain::{
    NewParcel, Parcel, ParcelDraft, ParcelId, ParcelQuery, ParcelType, RequestId, UserId,
};
use parcel_registry::persistence::{InMemoryParcelStore, ParcelStore, StoreError};
use parcel_registry::pricing::{
    DeliveryPricing, ExchangeRateError, ExchangeRateSource, parse_quote,
};
use parcel_registry::service::ParcelService;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

/// Replays a scripted sequence of raw quote answers, then repeats the last.
#[derive(Debug)]
pub struct ScriptedRates {
    answers: Mutex<VecDeque<Result<String, ExchangeRateError>>>,
    delay: Duration,
}

impl ScriptedRates {
    pub fn new(answers: impl IntoIterator<Item = Result<&'static str, ExchangeRateError>>) -> Self {
        Self {
            answers: Mutex::new(
                answers
                    .into_iter()
                    .map(|answer| answer.map(str::to_string))
                    .collect(),
            ),
            delay: Duration::ZERO,
        }
    }

    pub fn quoting(raw: &'static str) -> Self {
        Self::new([Ok(raw)])
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl ExchangeRateSource for ScriptedRates {
    async fn get_currency(&self, code: &str) -> Result<Decimal, ExchangeRateError> {
        tokio::time::sleep(self.delay).await;
        let mut answers = self.answers.lock().await;
        let answer = if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        };
        match answer {
            Some(Ok(raw)) => parse_quote(&raw),
            Some(Err(e)) => Err(e),
            None => Err(ExchangeRateError::Unavailable(format!("no quote for {code}"))),
        }
    }
}

/// Store wrapper whose inserts can be switched to fail.
#[derive(Debug)]
pub struct FlakyStore {
    pub inner: InMemoryParcelStore,
    pub fail_inserts: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryParcelStore::new(parcel_types()),
            fail_inserts: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ParcelStore for FlakyStore {
    async fn find_owned(&self, owner: UserId, id: ParcelId) -> Result<Option<Parcel>, StoreError> {
        self.inner.find_owned(owner, id).await
    }

    async fn list_owned(
        &self,
        owner: UserId,
        query: &ParcelQuery,
    ) -> Result<Vec<Parcel>, StoreError> {
        self.inner.list_owned(owner, query).await
    }

    async fn find_by_request(&self, request_id: RequestId) -> Result<Option<Parcel>, StoreError> {
        self.inner.find_by_request(request_id).await
    }

    async fn insert(&self, parcel: NewParcel) -> Result<Parcel, StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection reset by peer".to_string()));
        }
        self.inner.insert(parcel).await
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.inner.count().await
    }
}

pub fn parcel_types() -> Vec<ParcelType> {
    vec![
        ParcelType {
            id: 1,
            name: "clothes".to_string(),
        },
        ParcelType {
            id: 2,
            name: "electronics".to_string(),
        },
        ParcelType {
            id: 3,
            name: "misc".to_string(),
        },
    ]
}

pub fn config() -> RegistryConfig {
    RegistryConfig {
        exchange_rate_timeout: Duration::from_millis(200),
        default_limit: 10,
        max_limit: 50,
        ..RegistryConfig::default()
    }
}

pub fn service_with(
    store: Arc<dyn ParcelStore>,
    rates: impl ExchangeRateSource + 'static,
) -> ParcelService {
    let config = config();
    let pricing = DeliveryPricing::from_config(Arc::new(rates), &config);
    ParcelService::new(store, pricing, &config)
}

pub fn service(rates: impl ExchangeRateSource + 'static) -> ParcelService {
    service_with(Arc::new(InMemoryParcelStore::new(parcel_types())), rates)
}

pub fn user() -> UserId {
    UserId::from_uuid(uuid::Uuid::new_v4())
}

pub fn request() -> RequestId {
    RequestId::from_uuid(uuid::Uuid::new_v4())
}

pub fn draft(parcel_type_id: i32, dollar_price: i64, weight: i64) -> ParcelDraft {
    ParcelDraft {
        name: "parcel".to_string(),
        weight: Decimal::new(weight, 0),
        parcel_type_id,
        dollar_price: Decimal::new(dollar_price, 0),
        request_id: request(),
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("parcel_registry=debug"))
        .with_test_writer()
        .try_init();
}
