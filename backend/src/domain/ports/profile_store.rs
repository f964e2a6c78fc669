//! Port for role profile lookups.

use async_trait::async_trait;

use crate::domain::{IdentityId, Profile, Role};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile store adapters.
    pub enum ProfileStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "profile store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "profile store query failed: {message}",
    }
}

/// Read access to role profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile `identity` holds for `role`, if any.
    async fn find_profile(
        &self,
        role: Role,
        identity: IdentityId,
    ) -> Result<Option<Profile>, ProfileStoreError>;
}
