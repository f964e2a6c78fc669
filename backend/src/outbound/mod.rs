//! Outbound adapters implementing the account ports.
//!
//! - **credentials**: Argon2id hashing shared by every identity store
//! - **memory**: mutex-guarded store for development and tests
//! - **persistence**: PostgreSQL adapters built on Diesel
//!
//! Adapters translate between domain types and storage rows and carry no
//! business rules.

pub mod credentials;
pub mod memory;
pub mod persistence;
