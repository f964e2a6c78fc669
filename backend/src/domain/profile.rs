//! Role-tagged profiles attached to identities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::address::AddressId;
use super::identity::IdentityId;

/// Maximum length of a profile image reference.
pub const PROFILE_IMAGE_MAX: usize = 100;

/// Portal role. Fixed when the profile is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Patient portal.
    Patient,
    /// Doctor portal.
    Doctor,
}

/// Raised when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 2] = [Self::Patient, Self::Doctor];

    /// Lowercase role name used in paths and storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        }
    }

    /// Capitalised role name for messages.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Doctor => "Doctor",
        }
    }

    /// Entry point a client is sent to after registering.
    #[must_use]
    pub const fn login_path(self) -> &'static str {
        match self {
            Self::Patient => "/patient/login/",
            Self::Doctor => "/doctor/login/",
        }
    }

    /// Landing page after a successful login.
    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Patient => "/patient/dashboard/",
            Self::Doctor => "/doctor/dashboard/",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

/// Profile identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(Uuid);

impl ProfileId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a profile image reference is blank or too long.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileImageError {
    #[error("profile image reference must not be blank")]
    Blank,
    #[error("profile image reference must be at most {max} characters")]
    TooLong { max: usize },
}

/// Opaque reference to an uploaded profile image.
///
/// Storage of the image itself happens elsewhere; only the reference is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImageRef(String);

impl ProfileImageRef {
    /// Validate and construct a reference.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ProfileImageError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProfileImageError::Blank);
        }
        if trimmed.chars().count() > PROFILE_IMAGE_MAX {
            return Err(ProfileImageError::TooLong {
                max: PROFILE_IMAGE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ProfileImageRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A role profile.
///
/// ## Invariants
/// - At most one profile exists per `(role, identity_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    id: ProfileId,
    role: Role,
    identity_id: IdentityId,
    address_id: Option<AddressId>,
    image: Option<ProfileImageRef>,
}

impl Profile {
    /// Assemble a profile from stored parts.
    #[must_use]
    pub const fn new(
        id: ProfileId,
        role: Role,
        identity_id: IdentityId,
        address_id: Option<AddressId>,
        image: Option<ProfileImageRef>,
    ) -> Self {
        Self {
            id,
            role,
            identity_id,
            address_id,
            image,
        }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> ProfileId {
        self.id
    }

    /// Role this profile grants.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Owning identity.
    #[must_use]
    pub const fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// Linked address, if any.
    #[must_use]
    pub const fn address_id(&self) -> Option<AddressId> {
        self.address_id
    }

    /// Profile image reference, if any.
    #[must_use]
    pub const fn image(&self) -> Option<&ProfileImageRef> {
        self.image.as_ref()
    }
}
