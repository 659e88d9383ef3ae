//! Type-safe identifiers.
//!
//! Parcels, their owners and the idempotency tokens that create them are
//! all UUIDs on the wire. Each gets its own newtype so a request
//! identifier can never be passed where a parcel identifier is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! uuid_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates an identifier from an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_newtype!(
    /// Unique identifier of a registered parcel.
    ///
    /// Generated once when the parcel is first persisted and immutable
    /// thereafter.
    ParcelId
);

uuid_newtype!(
    /// Reference to the user that owns a parcel.
    ///
    /// Users live outside this crate; only their identity is carried.
    UserId
);

uuid_newtype!(
    /// Client-generated idempotency token for parcel registration.
    ///
    /// At most one parcel is ever stored per request identifier.
    RequestId
);

impl ParcelId {
    /// Creates a new random `ParcelId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ParcelId {
    fn default() -> Self {
        Self::new()
    }
}
