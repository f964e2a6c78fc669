//! Translation of pool and Diesel failures into the account port errors.
//!
//! Every adapter funnels failures through [`StoreFault`] first so the
//! classification (connection vs query vs unique violation) lives in one
//! place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::{debug, warn};

use crate::domain::ports::{AccountRepositoryError, IdentityStoreError, ProfileStoreError};

use super::pool::PoolError;

pub(crate) const USERNAME_CONSTRAINT: &str = "identities_username_key";
pub(crate) const EMAIL_CONSTRAINT: &str = "identities_email_key";
pub(crate) const PROFILE_CONSTRAINT: &str = "profiles_role_identity_id_key";

/// Unique keys the account tables enforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UniqueKey {
    Username,
    Email,
    Profile,
}

impl UniqueKey {
    fn from_constraint(name: &str) -> Option<Self> {
        match name {
            USERNAME_CONSTRAINT => Some(Self::Username),
            EMAIL_CONSTRAINT => Some(Self::Email),
            PROFILE_CONSTRAINT => Some(Self::Profile),
            _ => None,
        }
    }
}

/// Adapter-neutral classification of a storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFault {
    Connection(String),
    Query(String),
    Unique(UniqueKey),
}

impl From<PoolError> for StoreFault {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::Checkout { message } | PoolError::Build { message } => {
                Self::Connection(message)
            }
        }
    }
}

impl From<DieselError> for StoreFault {
    fn from(error: DieselError) -> Self {
        match &error {
            DieselError::DatabaseError(kind, info) => debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            ),
            _ => debug!(%error, "diesel operation failed"),
        }

        match error {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                match info.constraint_name().and_then(UniqueKey::from_constraint) {
                    Some(key) => Self::Unique(key),
                    None => {
                        warn!(
                            constraint = info.constraint_name(),
                            "unrecognised unique violation"
                        );
                        Self::Query(info.message().to_owned())
                    }
                }
            }
            DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
                Self::Connection(info.message().to_owned())
            }
            DieselError::DatabaseError(_, info) => Self::Query(info.message().to_owned()),
            DieselError::NotFound => Self::Query("record not found".to_owned()),
            other => Self::Query(other.to_string()),
        }
    }
}

impl From<StoreFault> for AccountRepositoryError {
    fn from(fault: StoreFault) -> Self {
        match fault {
            StoreFault::Connection(message) => Self::connection(message),
            StoreFault::Query(message) => Self::query(message),
            StoreFault::Unique(UniqueKey::Username) => Self::duplicate_username(),
            StoreFault::Unique(UniqueKey::Email) => Self::duplicate_email(),
            StoreFault::Unique(UniqueKey::Profile) => Self::duplicate_profile(),
        }
    }
}

impl From<StoreFault> for IdentityStoreError {
    fn from(fault: StoreFault) -> Self {
        match fault {
            StoreFault::Connection(message) => Self::connection(message),
            StoreFault::Query(message) => Self::query(message),
            StoreFault::Unique(key) => Self::query(format!("unexpected unique violation: {key:?}")),
        }
    }
}

impl From<StoreFault> for ProfileStoreError {
    fn from(fault: StoreFault) -> Self {
        match fault {
            StoreFault::Connection(message) => Self::connection(message),
            StoreFault::Query(message) => Self::query(message),
            StoreFault::Unique(key) => Self::query(format!("unexpected unique violation: {key:?}")),
        }
    }
}

/// Map a Diesel error straight into a port error.
pub(crate) fn map_diesel_error<E: From<StoreFault>>(error: DieselError) -> E {
    E::from(StoreFault::from(error))
}

/// Map a pool checkout failure straight into a port error.
pub(crate) fn map_pool_error<E: From<StoreFault>>(error: PoolError) -> E {
    E::from(StoreFault::from(error))
}
