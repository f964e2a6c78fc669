//! Driving port for role-scoped login.
//!
//! Inbound adapters call this port to turn submitted credentials into a
//! [`Principal`] without knowing which stores back the check.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, LoginError, Principal, Role};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and confirm the identity holds a `role` profile.
    async fn authenticate(
        &self,
        role: Role,
        credentials: &LoginCredentials,
    ) -> Result<Principal, LoginError>;
}
