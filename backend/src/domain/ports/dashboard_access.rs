//! Driving port for role dashboards.

use async_trait::async_trait;

use crate::domain::{Dashboard, DashboardError, Principal, Role};

/// Domain use-case port for loading the dashboard of a signed-in principal.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardAccess: Send + Sync {
    /// Assemble the `role` dashboard for `principal`.
    ///
    /// Fails with [`DashboardError::ProfileNotFound`] when the principal is
    /// bound to another role or its profile is missing.
    async fn dashboard(&self, principal: Principal, role: Role)
    -> Result<Dashboard, DashboardError>;
}
