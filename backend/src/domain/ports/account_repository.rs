//! Port for the transactional account write.
//!
//! Creating an account inserts the identity, the optional address and the
//! role profile as one unit. Adapters must leave no partial rows behind when
//! any step fails.

use async_trait::async_trait;

use crate::domain::{
    Address, AddressDraft, EmailAddress, Identity, Password, PersonName, Profile,
    ProfileImageRef, Role, Username,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountRepositoryError {
        /// The username is already taken.
        DuplicateUsername => "username already exists",
        /// The email is already registered.
        DuplicateEmail => "email already exists",
        /// The identity already holds a profile for this role.
        DuplicateProfile => "profile already exists for this role",
        /// Store connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
    }
}

/// Everything needed to create an account in one write.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Role of the profile to create.
    pub role: Role,
    /// Login name.
    pub username: Username,
    /// Contact email.
    pub email: EmailAddress,
    /// Plaintext password; the adapter stores only a hash.
    pub password: Password,
    /// Personal name.
    pub name: PersonName,
    /// Complete address, when supplied.
    pub address: Option<AddressDraft>,
    /// Profile image reference, when supplied.
    pub image: Option<ProfileImageRef>,
}

/// Rows created by a successful account write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    /// The new identity.
    pub identity: Identity,
    /// The new role profile.
    pub profile: Profile,
    /// The linked address, when one was created.
    pub address: Option<Address>,
}

/// Transactional account creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create identity, optional address and profile atomically.
    ///
    /// Unique-constraint violations surface as
    /// [`AccountRepositoryError::DuplicateUsername`] or
    /// [`AccountRepositoryError::DuplicateEmail`]; nothing is persisted on any
    /// error.
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<RegisteredAccount, AccountRepositoryError>;
}
