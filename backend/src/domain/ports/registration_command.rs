//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{RegistrationError, RegistrationRequest, Role};

use super::RegisteredAccount;

/// Domain use-case port for signing up a new account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Register a new identity with a `role` profile.
    async fn register(
        &self,
        role: Role,
        request: RegistrationRequest,
    ) -> Result<RegisteredAccount, RegistrationError>;
}
