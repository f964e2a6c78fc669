//! Argon2id credential hashing shared by the identity store adapters.
//!
//! Stored credentials are PHC strings, so verification reads the algorithm
//! parameters from the hash itself and keeps working after the defaults
//! change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::Password;

/// Errors raised while hashing or checking a credential.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// Hashing failed, e.g. because of invalid parameters.
    #[error("credential hashing failed: {0}")]
    Hash(String),
    /// The stored credential is not a parseable PHC string.
    #[error("stored credential is malformed: {0}")]
    MalformedHash(String),
}

/// Argon2id hasher.
///
/// # Examples
/// ```
/// use argon2::Params;
/// use portal::domain::Password;
/// use portal::outbound::credentials::CredentialHasher;
///
/// let hasher = CredentialHasher::with_params(Params::new(8, 1, 1, None).unwrap());
/// let password = Password::new("s3cret").unwrap();
/// let phc = hasher.hash(&password).unwrap();
/// assert!(hasher.verify(&password, &phc).unwrap());
/// ```
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::with_params(Params::default())
    }
}

impl CredentialHasher {
    /// Hasher with explicit cost parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hash `password` with a fresh random salt.
    pub fn hash(&self, password: &Password) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| CredentialError::Hash(err.to_string()))
    }

    /// Check `password` against a stored PHC string.
    pub fn verify(&self, password: &Password, stored: &str) -> Result<bool, CredentialError> {
        let parsed =
            PasswordHash::new(stored).map_err(|err| CredentialError::MalformedHash(err.to_string()))?;
        Ok(self
            .argon2
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok())
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) fn fast_hasher() -> CredentialHasher {
    match Params::new(8, 1, 1, None) {
        Ok(params) => CredentialHasher::with_params(params),
        Err(err) => panic!("cheap argon2 params rejected: {err}"),
    }
}
