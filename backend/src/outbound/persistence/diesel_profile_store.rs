//! PostgreSQL-backed `ProfileStore`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ProfileStore, ProfileStoreError};
use crate::domain::{IdentityId, Profile, Role};

use super::account_error_mapping::{map_diesel_error, map_pool_error};
use super::models::ProfileRow;
use super::pool::DbPool;
use super::schema::profiles;

/// Diesel implementation of role profile lookups.
#[derive(Clone)]
pub struct DieselProfileStore {
    pool: DbPool,
}

impl DieselProfileStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for DieselProfileStore {
    async fn find_profile(
        &self,
        role: Role,
        identity: IdentityId,
    ) -> Result<Option<Profile>, ProfileStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_pool_error::<ProfileStoreError>)?;
        let row = profiles::table
            .filter(profiles::role.eq(role.as_str()))
            .filter(profiles::identity_id.eq(*identity.as_uuid()))
            .select(ProfileRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error::<ProfileStoreError>)?;

        row.map(|row| row.into_profile().map_err(ProfileStoreError::query))
            .transpose()
    }
}
