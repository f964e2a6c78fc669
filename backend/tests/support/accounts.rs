//! Shared world for account behaviour suites.
//!
//! Drives the registration and login services against the in-memory store on
//! a single-threaded runtime, recording the latest outcome of each.

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use argon2::Params;
use portal::domain::ports::{
    IdentityStore, LoginService, RegisteredAccount, RegistrationCommand,
};
use portal::domain::{
    AuthenticationGate, LoginCredentials, LoginError, Principal, RegistrationError,
    RegistrationForm, RegistrationRequest, RegistrationService, Role, Username,
};
use portal::outbound::credentials::CredentialHasher;
use portal::outbound::memory::{AccountWriteStep, InMemoryAccountStore, TableCounts};
use tokio::runtime::Runtime;

pub struct AccountsWorld {
    runtime: Runtime,
    store: RefCell<Arc<InMemoryAccountStore>>,
    pub registration: RefCell<Option<Result<RegisteredAccount, RegistrationError>>>,
    pub login: RefCell<Option<Result<Principal, LoginError>>>,
}

/// Argon2 at minimum cost; the suites exercise flow, not hash strength.
fn hasher() -> CredentialHasher {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).expect("argon2 params");
    CredentialHasher::with_params(params)
}

pub fn parse_role(raw: &str) -> Role {
    raw.parse().expect("patient or doctor")
}

impl AccountsWorld {
    pub fn new() -> Self {
        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("test runtime"),
            store: RefCell::new(Arc::new(InMemoryAccountStore::new(hasher()))),
            registration: RefCell::new(None),
            login: RefCell::new(None),
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn store(&self) -> Arc<InMemoryAccountStore> {
        Arc::clone(&self.store.borrow())
    }

    pub fn fail_at(&self, step: AccountWriteStep) {
        *self.store.borrow_mut() = Arc::new(InMemoryAccountStore::failing_at(hasher(), step));
    }

    pub fn register(&self, role: Role, form: RegistrationForm<'_>) {
        let request = RegistrationRequest::from(form);
        let store = self.store();
        let service = RegistrationService::new(Arc::clone(&store), store);
        let outcome = self.block_on(service.register(role, request));
        *self.registration.borrow_mut() = Some(outcome);
    }

    pub fn sign_in(&self, role: Role, username: &str, password: &str) {
        let credentials =
            LoginCredentials::try_from_parts(username, password).expect("non-blank credentials");
        let store = self.store();
        let gate = AuthenticationGate::new(Arc::clone(&store), store);
        let outcome = self.block_on(gate.authenticate(role, &credentials));
        *self.login.borrow_mut() = Some(outcome);
    }

    pub fn attach_profile(&self, role: Role, username: &str) {
        let store = self.store();
        let username = Username::new(username).expect("username");
        let identity = self
            .block_on(store.find_by_username(&username))
            .expect("lookup")
            .expect("registered identity");
        store
            .attach_profile(role, identity.id())
            .expect("profile attached");
    }

    pub fn counts(&self) -> TableCounts {
        self.store().counts().expect("counts")
    }

    pub fn registration_error(&self) -> RegistrationError {
        match self.registration.borrow().as_ref().expect("registration ran") {
            Ok(_) => panic!("expected registration to fail"),
            Err(err) => err.clone(),
        }
    }

    pub fn login_error(&self) -> LoginError {
        match self.login.borrow().as_ref().expect("login ran") {
            Ok(_) => panic!("expected login to be refused"),
            Err(err) => err.clone(),
        }
    }
}
