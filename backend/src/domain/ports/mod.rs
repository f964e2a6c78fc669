//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`IdentityStore`, `ProfileStore`, `AccountRepository`,
//! `DashboardQuery`) are implemented by outbound adapters. Driving ports
//! (`RegistrationCommand`, `LoginService`, `DashboardAccess`) are
//! implemented by domain services and consumed by HTTP handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod dashboard_access;
mod dashboard_query;
mod identity_store;
mod login_service;
mod profile_store;
mod registration_command;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{
    AccountRepository, AccountRepositoryError, NewAccount, RegisteredAccount,
};
#[cfg(test)]
pub use dashboard_access::MockDashboardAccess;
pub use dashboard_access::DashboardAccess;
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dashboard_query::{DashboardQuery, DashboardQueryError, SampleDashboardQuery};
#[cfg(test)]
pub use identity_store::MockIdentityStore;
pub use identity_store::{IdentityStore, IdentityStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use profile_store::MockProfileStore;
pub use profile_store::{ProfileStore, ProfileStoreError};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::RegistrationCommand;
