//! Ports the HTTP handlers depend on.
//!
//! Handlers receive this through `web::Data` and never see a concrete
//! adapter, so tests can swap in mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{DashboardAccess, LoginService, RegistrationCommand};

/// Dependency bundle for the account handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationCommand>,
    pub login: Arc<dyn LoginService>,
    pub dashboards: Arc<dyn DashboardAccess>,
}

impl HttpState {
    pub fn new(
        registration: Arc<dyn RegistrationCommand>,
        login: Arc<dyn LoginService>,
        dashboards: Arc<dyn DashboardAccess>,
    ) -> Self {
        Self {
            registration,
            login,
            dashboards,
        }
    }
}
