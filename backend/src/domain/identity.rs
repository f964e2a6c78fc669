//! Authenticatable account data.
//!
//! An [`Identity`] owns the login name, contact email and personal name of an
//! account. The password credential is deliberately absent: only the
//! credential store adapters ever see it.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 150;
/// Maximum length of each personal name component.
pub const PERSON_NAME_MAX: usize = 150;
/// Maximum email length in characters.
pub const EMAIL_MAX: usize = 254;

/// Validation errors raised while constructing identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    #[error("identity id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    #[error("username may only contain letters, digits and @/./+/-/_")]
    UsernameInvalidCharacters,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("email must look like local@domain")]
    MalformedEmail,
    #[error("{field} must be at most {max} characters")]
    NameTooLong { field: &'static str, max: usize },
}

/// Stable identity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(Uuid);

impl IdentityId {
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

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdentityId {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() != s {
            return Err(IdentityValidationError::InvalidId);
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidId)
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9@.+\-_]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Login name, unique across all identities.
///
/// # Examples
/// ```
/// use portal::domain::Username;
///
/// assert!(Username::new("ada.lovelace").is_ok());
/// assert!(Username::new("ada lovelace").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        if value.chars().count() > USERNAME_MAX {
            return Err(IdentityValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&value) {
            return Err(IdentityValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email, unique across all identities.
///
/// The domain part is normalised to lowercase; the local part is kept as
/// supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate, normalise and construct an [`EmailAddress`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(IdentityValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(IdentityValidationError::MalformedEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(IdentityValidationError::MalformedEmail);
        }
        Ok(Self(format!("{local}@{}", domain.to_ascii_lowercase())))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// First and last name. Either component may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    first: String,
    last: String,
}

impl PersonName {
    /// Construct a name, trimming both components.
    pub fn new(
        first: impl AsRef<str>,
        last: impl AsRef<str>,
    ) -> Result<Self, IdentityValidationError> {
        let first = Self::component("firstName", first.as_ref())?;
        let last = Self::component("lastName", last.as_ref())?;
        Ok(Self { first, last })
    }

    fn component(field: &'static str, raw: &str) -> Result<String, IdentityValidationError> {
        let value = raw.trim();
        if value.chars().count() > PERSON_NAME_MAX {
            return Err(IdentityValidationError::NameTooLong {
                field,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(value.to_owned())
    }

    /// First name.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Last name.
    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }

    /// Full name joined by a single space, empty when both parts are.
    #[must_use]
    pub fn full(&self) -> String {
        match (self.first.is_empty(), self.last.is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.first.clone(),
            (true, false) => self.last.clone(),
            (false, false) => format!("{} {}", self.first, self.last),
        }
    }
}

/// An authenticatable account.
///
/// ## Invariants
/// - `username` and `email` are unique across identities; the stores enforce
///   this, not the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: IdentityId,
    username: Username,
    email: EmailAddress,
    name: PersonName,
}

impl Identity {
    /// Assemble an identity from validated parts.
    #[must_use]
    pub const fn new(
        id: IdentityId,
        username: Username,
        email: EmailAddress,
        name: PersonName,
    ) -> Self {
        Self {
            id,
            username,
            email,
            name,
        }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> IdentityId {
        self.id
    }

    /// Login name.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Personal name.
    #[must_use]
    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    /// Name shown to the account holder; falls back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = self.name.full();
        if full.is_empty() {
            self.username.to_string()
        } else {
            full
        }
    }
}
