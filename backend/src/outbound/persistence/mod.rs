//! PostgreSQL adapters for the account ports.
//!
//! Row structs and the Diesel schema stay private to this module; adapters
//! hand back validated domain values only. Connections come from a shared
//! `bb8` pool driven by `diesel-async`, and every failure is classified once
//! in `account_error_mapping` before it reaches a port.
//!
//! ```ignore
//! use portal::outbound::persistence::{DbPool, DieselProfileStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/portal")).await?;
//! let profiles = DieselProfileStore::new(pool);
//! ```

mod account_error_mapping;
mod diesel_account_repository;
mod diesel_identity_store;
mod diesel_profile_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_identity_store::DieselIdentityStore;
pub use diesel_profile_store::DieselProfileStore;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
