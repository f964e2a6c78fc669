//! In-memory account store.
//!
//! Serves local runs without a database and backs the HTTP and BDD tests.
//! One mutex guards all three tables, and account writes stage their rows and
//! commit only after every step succeeded, so the store keeps the same
//! uniqueness and all-or-nothing guarantees as the PostgreSQL adapter.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, IdentityStore, IdentityStoreError, NewAccount,
    ProfileStore, ProfileStoreError, RegisteredAccount,
};
use crate::domain::{
    Address, AddressId, EmailAddress, Identity, IdentityId, Password, Profile, ProfileId, Role,
    Username,
};

use super::credentials::CredentialHasher;

/// Write step at which [`InMemoryAccountStore::failing_at`] injects a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountWriteStep {
    Identity,
    Address,
    Profile,
}

#[derive(Debug, Clone)]
struct StoredIdentity {
    identity: Identity,
    credential: String,
}

#[derive(Debug, Default)]
struct Tables {
    identities: HashMap<IdentityId, StoredIdentity>,
    addresses: HashMap<AddressId, Address>,
    profiles: HashMap<(Role, IdentityId), Profile>,
}

impl Tables {
    fn username_taken(&self, username: &Username) -> bool {
        self.identities
            .values()
            .any(|row| row.identity.username() == username)
    }

    fn email_taken(&self, email: &EmailAddress) -> bool {
        self.identities
            .values()
            .any(|row| row.identity.email() == email)
    }

    fn by_username(&self, username: &str) -> Option<&StoredIdentity> {
        self.identities
            .values()
            .find(|row| row.identity.username().as_ref() == username)
    }
}

/// Row counts, used by tests to assert that failed writes left no trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub identities: usize,
    pub addresses: usize,
    pub profiles: usize,
}

/// Account, identity and profile store held in process memory.
#[derive(Debug)]
pub struct InMemoryAccountStore {
    tables: Mutex<Tables>,
    hasher: CredentialHasher,
    fault: Option<AccountWriteStep>,
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new(CredentialHasher::default())
    }
}

impl InMemoryAccountStore {
    /// Empty store hashing credentials with `hasher`.
    #[must_use]
    pub fn new(hasher: CredentialHasher) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            hasher,
            fault: None,
        }
    }

    /// Empty store whose account writes always fail at `step`.
    #[must_use]
    pub fn failing_at(hasher: CredentialHasher, step: AccountWriteStep) -> Self {
        Self {
            fault: Some(step),
            ..Self::new(hasher)
        }
    }

    /// Current row counts.
    pub fn counts(&self) -> Result<TableCounts, AccountRepositoryError> {
        let tables = self.lock().map_err(AccountRepositoryError::query)?;
        Ok(TableCounts {
            identities: tables.identities.len(),
            addresses: tables.addresses.len(),
            profiles: tables.profiles.len(),
        })
    }

    /// Attach an extra role profile to an existing identity.
    ///
    /// Registration always creates a new identity; this is how an identity
    /// comes to hold both a patient and a doctor profile.
    pub fn attach_profile(
        &self,
        role: Role,
        identity: IdentityId,
    ) -> Result<Profile, AccountRepositoryError> {
        let mut tables = self.lock().map_err(AccountRepositoryError::query)?;
        if !tables.identities.contains_key(&identity) {
            return Err(AccountRepositoryError::query(format!(
                "identity {identity} does not exist"
            )));
        }
        if tables.profiles.contains_key(&(role, identity)) {
            return Err(AccountRepositoryError::duplicate_profile());
        }
        let profile = Profile::new(ProfileId::random(), role, identity, None, None);
        tables.profiles.insert((role, identity), profile.clone());
        Ok(profile)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, String> {
        self.tables
            .lock()
            .map_err(|_| "in-memory store lock poisoned".to_owned())
    }

    fn inject(&self, step: AccountWriteStep) -> Result<(), AccountRepositoryError> {
        if self.fault == Some(step) {
            return Err(AccountRepositoryError::query(format!(
                "injected fault while creating {step:?}"
            )));
        }
        Ok(())
    }

    fn stage(
        &self,
        tables: &Tables,
        account: NewAccount,
        credential: String,
    ) -> Result<(StoredIdentity, RegisteredAccount), AccountRepositoryError> {
        if tables.username_taken(&account.username) {
            return Err(AccountRepositoryError::duplicate_username());
        }
        if tables.email_taken(&account.email) {
            return Err(AccountRepositoryError::duplicate_email());
        }

        self.inject(AccountWriteStep::Identity)?;
        let identity = Identity::new(
            IdentityId::random(),
            account.username,
            account.email,
            account.name,
        );

        let address = match account.address {
            Some(draft) => {
                self.inject(AccountWriteStep::Address)?;
                Some(Address::new(AddressId::random(), draft))
            }
            None => None,
        };

        self.inject(AccountWriteStep::Profile)?;
        let profile = Profile::new(
            ProfileId::random(),
            account.role,
            identity.id(),
            address.as_ref().map(Address::id),
            account.image,
        );

        let stored = StoredIdentity {
            identity: identity.clone(),
            credential,
        };
        Ok((
            stored,
            RegisteredAccount {
                identity,
                profile,
                address,
            },
        ))
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<RegisteredAccount, AccountRepositoryError> {
        let credential = self
            .hasher
            .hash(&account.password)
            .map_err(|err| AccountRepositoryError::query(err.to_string()))?;

        let mut tables = self.lock().map_err(AccountRepositoryError::query)?;
        let (stored, registered) = self.stage(&tables, account, credential)?;

        let identity_id = registered.identity.id();
        tables.identities.insert(identity_id, stored);
        if let Some(address) = &registered.address {
            tables.addresses.insert(address.id(), address.clone());
        }
        tables.profiles.insert(
            (registered.profile.role(), identity_id),
            registered.profile.clone(),
        );
        debug!(%identity_id, "in-memory account committed");
        Ok(registered)
    }
}

#[async_trait]
impl IdentityStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityStoreError> {
        let tables = self.lock().map_err(IdentityStoreError::query)?;
        Ok(tables.identities.get(&id).map(|row| row.identity.clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityStoreError> {
        let tables = self.lock().map_err(IdentityStoreError::query)?;
        Ok(tables
            .by_username(username.as_ref())
            .map(|row| row.identity.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityStoreError> {
        let tables = self.lock().map_err(IdentityStoreError::query)?;
        Ok(tables
            .identities
            .values()
            .find(|row| row.identity.email() == email)
            .map(|row| row.identity.clone()))
    }

    async fn verify_credential(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<Option<Identity>, IdentityStoreError> {
        let candidate = {
            let tables = self.lock().map_err(IdentityStoreError::query)?;
            tables.by_username(username).cloned()
        };
        let Some(row) = candidate else {
            return Ok(None);
        };
        let matches = self
            .hasher
            .verify(password, &row.credential)
            .map_err(|err| IdentityStoreError::query(err.to_string()))?;
        Ok(matches.then_some(row.identity))
    }
}

#[async_trait]
impl ProfileStore for InMemoryAccountStore {
    async fn find_profile(
        &self,
        role: Role,
        identity: IdentityId,
    ) -> Result<Option<Profile>, ProfileStoreError> {
        let tables = self.lock().map_err(ProfileStoreError::query)?;
        Ok(tables.profiles.get(&(role, identity)).cloned())
    }
}
