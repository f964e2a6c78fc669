//! Builders wiring the account services to a store.

use std::sync::Arc;

use actix_web::web;

use portal::domain::ports::{
    AccountRepository, DashboardAccess, IdentityStore, LoginService, ProfileStore,
    RegistrationCommand, SampleDashboardQuery,
};
use portal::domain::{AuthenticationGate, DashboardService, RegistrationService};
use portal::inbound::http::state::HttpState;
use portal::outbound::credentials::CredentialHasher;
use portal::outbound::memory::InMemoryAccountStore;
use portal::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselIdentityStore, DieselProfileStore,
};

use super::ServerConfig;

/// The three stores the account services read and write.
struct Stores<I, P, A> {
    identities: Arc<I>,
    profiles: Arc<P>,
    accounts: Arc<A>,
}

impl Stores<DieselIdentityStore, DieselProfileStore, DieselAccountRepository> {
    fn diesel(pool: &DbPool, hasher: &CredentialHasher) -> Self {
        Self {
            identities: Arc::new(DieselIdentityStore::new(pool.clone(), hasher.clone())),
            profiles: Arc::new(DieselProfileStore::new(pool.clone())),
            accounts: Arc::new(DieselAccountRepository::new(pool.clone(), hasher.clone())),
        }
    }
}

impl Stores<InMemoryAccountStore, InMemoryAccountStore, InMemoryAccountStore> {
    fn memory(hasher: &CredentialHasher) -> Self {
        let store = Arc::new(InMemoryAccountStore::new(hasher.clone()));
        Self {
            identities: Arc::clone(&store),
            profiles: Arc::clone(&store),
            accounts: store,
        }
    }
}

fn services<I, P, A>(stores: Stores<I, P, A>) -> HttpState
where
    I: IdentityStore + 'static,
    P: ProfileStore + 'static,
    A: AccountRepository + 'static,
{
    let Stores {
        identities,
        profiles,
        accounts,
    } = stores;
    let registration: Arc<dyn RegistrationCommand> =
        Arc::new(RegistrationService::new(Arc::clone(&identities), accounts));
    let login: Arc<dyn LoginService> = Arc::new(AuthenticationGate::new(
        Arc::clone(&identities),
        Arc::clone(&profiles),
    ));
    let dashboards: Arc<dyn DashboardAccess> = Arc::new(DashboardService::new(
        identities,
        profiles,
        Arc::new(SampleDashboardQuery),
    ));
    HttpState::new(registration, login, dashboards)
}

/// Build the shared HTTP state, backed by PostgreSQL when a pool is
/// configured and by process memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = CredentialHasher::default();
    let state = match &config.db_pool {
        Some(pool) => services(Stores::diesel(pool, &hasher)),
        None => services(Stores::memory(&hasher)),
    };
    web::Data::new(state)
}
