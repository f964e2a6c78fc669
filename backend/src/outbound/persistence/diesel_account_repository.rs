//! PostgreSQL-backed `AccountRepository`.
//!
//! The identity, optional address, and profile rows are written inside one
//! transaction. Duplicate usernames, emails, and role profiles surface from
//! the unique constraints, which also settles concurrent signups racing past
//! the service's pre-checks.

use async_trait::async_trait;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, NewAccount, RegisteredAccount,
};
use crate::domain::{
    Address, AddressId, Identity, IdentityId, Password, PersonName, Profile, ProfileId,
};
use crate::outbound::credentials::CredentialHasher;

use super::account_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewAddressRow, NewIdentityRow, NewProfileRow};
use super::pool::DbPool;
use super::schema::{addresses, identities, profiles};

/// Diesel implementation of account creation.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
    hasher: CredentialHasher,
}

impl DieselAccountRepository {
    pub fn new(pool: DbPool, hasher: CredentialHasher) -> Self {
        Self { pool, hasher }
    }

    async fn hash(&self, password: Password) -> Result<String, AccountRepositoryError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| AccountRepositoryError::query(err.to_string()))?
            .map_err(|err| AccountRepositoryError::query(err.to_string()))
    }
}

/// Insert the identity, optional address, and profile rows in one transaction.
async fn insert_account(
    conn: &mut AsyncPgConnection,
    credential: &str,
    identity: &Identity,
    address: Option<&Address>,
    profile: &Profile,
) -> Result<(), diesel::result::Error> {
    let name = identity.name();
    let identity_row = NewIdentityRow {
        id: *identity.id().as_uuid(),
        username: identity.username().as_ref(),
        email: identity.email().as_ref(),
        credential,
        first_name: PersonName::first(name),
        last_name: PersonName::last(name),
    };
    let address_row =
        address.map(|address| NewAddressRow::from_draft(address.id(), address.fields()));
    let profile_row = NewProfileRow {
        id: *profile.id().as_uuid(),
        role: profile.role().as_str(),
        identity_id: *profile.identity_id().as_uuid(),
        address_id: profile.address_id().map(|id| *id.as_uuid()),
        image_ref: profile.image().map(AsRef::as_ref),
    };

    conn.transaction(|conn| {
        async move {
            diesel::insert_into(identities::table)
                .values(&identity_row)
                .execute(conn)
                .await?;
            if let Some(row) = &address_row {
                diesel::insert_into(addresses::table)
                    .values(row)
                    .execute(conn)
                    .await?;
            }
            diesel::insert_into(profiles::table)
                .values(&profile_row)
                .execute(conn)
                .await?;
            Ok(())
        }
        .scope_boxed()
    })
    .await
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create_account(
        &self,
        account: NewAccount,
    ) -> Result<RegisteredAccount, AccountRepositoryError> {
        let NewAccount {
            role,
            username,
            email,
            password,
            name,
            address,
            image,
        } = account;
        let credential = self.hash(password).await?;

        let identity_id = IdentityId::random();
        let address = address.map(|draft| Address::new(AddressId::random(), draft));
        let identity = Identity::new(identity_id, username, email, name);
        let profile = Profile::new(
            ProfileId::random(),
            role,
            identity_id,
            address.as_ref().map(Address::id),
            image,
        );

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_pool_error::<AccountRepositoryError>)?;
        insert_account(&mut conn, &credential, &identity, address.as_ref(), &profile)
            .await
            .map_err(map_diesel_error::<AccountRepositoryError>)?;

        debug!(%identity_id, %role, "account rows committed");

        Ok(RegisteredAccount {
            identity,
            profile,
            address,
        })
    }
}
