//! Registry error types with HTTP status code mapping.
//!
//! [`RegistryError`] is the caller-facing error of the parcel service.
//! Each variant maps to a status classification and a numeric code, and
//! renders as the structured JSON error body when returned from an axum
//! handler.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::domain::{DraftError, ParcelId};
use crate::persistence::StoreError;
use crate::pricing::PricingError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "parcel not found: 6f1c2a4e-8d0b-4c6e-9a51-3f2d7b9e0c11",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Underlying cause, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Parcel service error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                 |
/// |-----------|-----------------|-----------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request             |
/// | 2000–2999 | Not Found       | 404 Not Found               |
/// | 3000–3999 | Server          | 500 / 503                   |
///
/// None of these are retried internally.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Parcel is missing or owned by another user.
    #[error("parcel not found: {0}")]
    NotFound(ParcelId),

    /// The registration draft is malformed.
    #[error("invalid parcel: {0}")]
    InvalidDraft(#[from] DraftError),

    /// The new parcel could not be stored.
    #[error("couldn't add parcel")]
    CreateFailed {
        /// Store failure that prevented the insert.
        #[source]
        source: StoreError,
    },

    /// No usable exchange quote, so no delivery price could be computed.
    #[error("delivery pricing unavailable")]
    PricingUnavailable {
        /// Pricing failure behind the missing price.
        #[source]
        source: PricingError,
    },

    /// Store failure outside the insert path.
    #[error("persistence error: {0}")]
    Store(#[from] StoreError),
}

impl RegistryError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::CreateFailed { .. } => 1001,
            Self::InvalidDraft(_) => 1002,
            Self::NotFound(_) => 2001,
            Self::Store(_) => 3001,
            Self::PricingUnavailable { .. } => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::CreateFailed { .. } | Self::InvalidDraft(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PricingUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the underlying cause rendered for the `details` field.
    ///
    /// Request-identifier conflicts and backend failures stay out of the
    /// body; they are logged where they happen.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::CreateFailed {
                source: source @ StoreError::UnknownParcelType(_),
            } => Some(source.to_string()),
            Self::PricingUnavailable { source } => Some(source.to_string()),
            Self::CreateFailed { .. }
            | Self::InvalidDraft(_)
            | Self::NotFound(_)
            | Self::Store(_) => None,
        }
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
