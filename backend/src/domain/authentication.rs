//! Login credentials and the authentication gate.
//!
//! A login attempt passes two checks in order: the credential must verify
//! against the identity store, then the identity must hold a profile for the
//! requested role. Only an attempt that clears both yields a [`Principal`]
//! that inbound adapters may bind to a session.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    IdentityStore, IdentityStoreError, LoginService, ProfileStore, ProfileStoreError,
};
use crate::domain::{Error, IdentityId, Role};

/// Raised when login or registration input is missing required values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Plaintext password held only for the duration of a request.
///
/// The buffer is zeroed on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a non-empty password. Whitespace is kept as supplied.
    pub fn new(raw: &str) -> Result<Self, LoginValidationError> {
        if raw.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Borrow the plaintext.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty.
///
/// # Examples
/// ```
/// use portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "secret").unwrap();
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Password::new(password)?,
        })
    }

    /// Username used for the lookup.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Candidate password.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

/// The identity and role a session is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    identity_id: IdentityId,
    role: Role,
}

impl Principal {
    /// Pair an identity with the role it signed in as.
    #[must_use]
    pub const fn new(identity_id: IdentityId, role: Role) -> Self {
        Self { identity_id, role }
    }

    /// Authenticated identity.
    #[must_use]
    pub const fn identity_id(&self) -> IdentityId {
        self.identity_id
    }

    /// Role the session grants.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

/// Reasons a login attempt is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// Unknown username or wrong password.
    #[error("Invalid username or password")]
    InvalidCredentials,
    /// Credential verified but the identity has no profile for the role.
    #[error("This account is not registered as a {role}")]
    WrongRole { role: Role },
    /// A backing store could not be reached.
    #[error("login store unavailable: {message}")]
    Unavailable { message: String },
    /// A backing store failed unexpectedly.
    #[error("login store failure: {message}")]
    StoreFailure { message: String },
}

impl From<IdentityStoreError> for LoginError {
    fn from(value: IdentityStoreError) -> Self {
        match value {
            IdentityStoreError::Connection { message } => Self::Unavailable { message },
            IdentityStoreError::Query { message } => Self::StoreFailure { message },
        }
    }
}

impl From<ProfileStoreError> for LoginError {
    fn from(value: ProfileStoreError) -> Self {
        match value {
            ProfileStoreError::Connection { message } => Self::Unavailable { message },
            ProfileStoreError::Query { message } => Self::StoreFailure { message },
        }
    }
}

impl From<LoginError> for Error {
    fn from(value: LoginError) -> Self {
        match value {
            LoginError::InvalidCredentials => Self::unauthorized(value.to_string()),
            LoginError::WrongRole { .. } => Self::forbidden(value.to_string()),
            LoginError::Unavailable { .. } => Self::service_unavailable(value.to_string()),
            LoginError::StoreFailure { .. } => Self::internal(value.to_string()),
        }
    }
}

/// Terminal state of a single login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAttempt {
    /// Credential and role both checked out.
    SessionGranted,
    /// Credential did not verify.
    CredentialInvalid,
    /// Credential verified but the role profile is missing.
    WrongRole,
}

impl LoginAttempt {
    /// Classify a finished attempt. Store failures have no terminal state.
    #[must_use]
    pub const fn classify(result: &Result<Principal, LoginError>) -> Option<Self> {
        match result {
            Ok(_) => Some(Self::SessionGranted),
            Err(LoginError::InvalidCredentials) => Some(Self::CredentialInvalid),
            Err(LoginError::WrongRole { .. }) => Some(Self::WrongRole),
            Err(LoginError::Unavailable { .. } | LoginError::StoreFailure { .. }) => None,
        }
    }
}

/// Authentication gate implementing [`LoginService`].
#[derive(Clone)]
pub struct AuthenticationGate<I, P> {
    identities: Arc<I>,
    profiles: Arc<P>,
}

impl<I, P> AuthenticationGate<I, P> {
    /// Create a gate over the given stores.
    pub const fn new(identities: Arc<I>, profiles: Arc<P>) -> Self {
        Self {
            identities,
            profiles,
        }
    }
}

impl<I, P> AuthenticationGate<I, P>
where
    I: IdentityStore,
    P: ProfileStore,
{
    async fn check(&self, role: Role, credentials: &LoginCredentials) -> Result<Principal, LoginError> {
        let identity = self
            .identities
            .verify_credential(credentials.username(), credentials.password())
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        self.profiles
            .find_profile(role, identity.id())
            .await?
            .ok_or(LoginError::WrongRole { role })?;

        Ok(Principal::new(identity.id(), role))
    }
}

#[async_trait]
impl<I, P> LoginService for AuthenticationGate<I, P>
where
    I: IdentityStore,
    P: ProfileStore,
{
    async fn authenticate(
        &self,
        role: Role,
        credentials: &LoginCredentials,
    ) -> Result<Principal, LoginError> {
        let result = self.check(role, credentials).await;
        match &result {
            Ok(principal) => {
                info!(identity_id = %principal.identity_id(), %role, "login granted");
            }
            Err(err) => debug!(
                outcome = ?LoginAttempt::classify(&result),
                error = %err,
                %role,
                "login refused"
            ),
        }
        result
    }
}

#[cfg(test)]
#[path = "authentication_tests.rs"]
mod tests;
