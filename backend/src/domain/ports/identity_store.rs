//! Port for identity lookups and credential verification.
//!
//! Adapters own password hashing; callers hand over the plaintext candidate
//! and only ever learn whether it matched.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Identity, IdentityId, Password, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity store adapters.
    pub enum IdentityStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "identity store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "identity store query failed: {message}",
    }
}

/// Read access to stored identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Fetch an identity by identifier.
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityStoreError>;

    /// Fetch an identity by exact username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityStoreError>;

    /// Fetch an identity by normalised email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityStoreError>;

    /// Check a password against the stored credential for `username`.
    ///
    /// Returns `Ok(None)` both for unknown usernames and wrong passwords.
    async fn verify_credential(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<Option<Identity>, IdentityStoreError>;
}
