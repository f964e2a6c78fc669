//! PostgreSQL-backed `IdentityStore`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{IdentityStore, IdentityStoreError};
use crate::domain::{EmailAddress, Identity, IdentityId, Password, Username};
use crate::outbound::credentials::CredentialHasher;

use super::account_error_mapping::{map_diesel_error, map_pool_error};
use super::models::IdentityRow;
use super::pool::DbPool;
use super::schema::identities;

/// Column an identity is looked up by.
#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    Id(Uuid),
    Username(&'a str),
    Email(&'a str),
}

/// Diesel implementation of identity lookups and credential checks.
#[derive(Clone)]
pub struct DieselIdentityStore {
    pool: DbPool,
    hasher: CredentialHasher,
}

impl DieselIdentityStore {
    pub fn new(pool: DbPool, hasher: CredentialHasher) -> Self {
        Self { pool, hasher }
    }

    async fn first_row(
        &self,
        lookup: Lookup<'_>,
    ) -> Result<Option<IdentityRow>, IdentityStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_pool_error::<IdentityStoreError>)?;
        let query = identities::table
            .select(IdentityRow::as_select())
            .into_boxed();
        let query = match lookup {
            Lookup::Id(id) => query.filter(identities::id.eq(id)),
            Lookup::Username(username) => query.filter(identities::username.eq(username)),
            Lookup::Email(email) => query.filter(identities::email.eq(email)),
        };
        query
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error::<IdentityStoreError>)
    }
}

fn into_identity(row: IdentityRow) -> Result<Identity, IdentityStoreError> {
    row.into_identity().map_err(IdentityStoreError::query)
}

#[async_trait]
impl IdentityStore for DieselIdentityStore {
    async fn find_by_id(&self, id: IdentityId) -> Result<Option<Identity>, IdentityStoreError> {
        self.first_row(Lookup::Id(*id.as_uuid()))
            .await?
            .map(into_identity)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityStoreError> {
        self.first_row(Lookup::Username(username.as_ref()))
            .await?
            .map(into_identity)
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityStoreError> {
        self.first_row(Lookup::Email(email.as_ref()))
            .await?
            .map(into_identity)
            .transpose()
    }

    async fn verify_credential(
        &self,
        username: &str,
        password: &Password,
    ) -> Result<Option<Identity>, IdentityStoreError> {
        let Some(row) = self
            .first_row(Lookup::Username(username))
            .await?
        else {
            return Ok(None);
        };

        let hasher = self.hasher.clone();
        let password = password.clone();
        let stored = row.credential.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|err| IdentityStoreError::query(err.to_string()))?
            .map_err(|err| IdentityStoreError::query(err.to_string()))?;

        if matches {
            into_identity(row).map(Some)
        } else {
            Ok(None)
        }
    }
}
