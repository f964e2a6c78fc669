//! Diesel row structs for the account tables.
//!
//! Rows never leave the persistence module; the conversions below rebuild
//! validated domain values and report corrupt rows as query errors.

use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    AddressDraft, AddressId, EmailAddress, Identity, IdentityId, PersonName, Profile,
    ProfileId, ProfileImageRef, Role, Username,
};

use super::schema::{addresses, identities, profiles};

/// Row read from `identities`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdentityRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub credential: String,
    pub first_name: String,
    pub last_name: String,
}

impl IdentityRow {
    /// Rebuild the domain identity; the credential stays behind.
    pub fn into_identity(self) -> Result<Identity, String> {
        let username = Username::new(self.username).map_err(|err| corrupt("identity", &err))?;
        let email = EmailAddress::new(&self.email).map_err(|err| corrupt("identity", &err))?;
        let name = PersonName::new(&self.first_name, &self.last_name)
            .map_err(|err| corrupt("identity", &err))?;
        Ok(Identity::new(
            IdentityId::from_uuid(self.id),
            username,
            email,
            name,
        ))
    }
}

/// Insertable identity.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = identities)]
pub(crate) struct NewIdentityRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub credential: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Insertable address.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = addresses)]
pub(crate) struct NewAddressRow<'a> {
    pub id: Uuid,
    pub line1: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub postal_code: &'a str,
}

impl<'a> NewAddressRow<'a> {
    pub fn from_draft(id: AddressId, draft: &'a AddressDraft) -> Self {
        Self {
            id: *id.as_uuid(),
            line1: draft.line1(),
            city: draft.city(),
            state: draft.state(),
            postal_code: draft.postal_code(),
        }
    }
}

/// Row read from `profiles`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub role: String,
    pub identity_id: Uuid,
    pub address_id: Option<Uuid>,
    pub image_ref: Option<String>,
}

impl ProfileRow {
    pub fn into_profile(self) -> Result<Profile, String> {
        let role: Role = self.role.parse().map_err(|err| corrupt("profile", &err))?;
        let image = self
            .image_ref
            .map(ProfileImageRef::new)
            .transpose()
            .map_err(|err| corrupt("profile", &err))?;
        Ok(Profile::new(
            ProfileId::from_uuid(self.id),
            role,
            IdentityId::from_uuid(self.identity_id),
            self.address_id.map(AddressId::from_uuid),
            image,
        ))
    }
}

/// Insertable profile.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: Uuid,
    pub role: &'a str,
    pub identity_id: Uuid,
    pub address_id: Option<Uuid>,
    pub image_ref: Option<&'a str>,
}

fn corrupt(entity: &str, err: &dyn std::fmt::Display) -> String {
    format!("stored {entity} row is invalid: {err}")
}
