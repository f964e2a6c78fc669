//! Account registration.
//!
//! [`RegistrationService`] runs three ordered checks (password confirmation,
//! username, email) against the raw request, then validates field shapes and
//! hands a [`NewAccount`] to the [`AccountRepository`], which writes identity,
//! address and profile in one transaction. The first failing check wins.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, IdentityStore, IdentityStoreError, NewAccount,
    RegisteredAccount, RegistrationCommand,
};
use crate::domain::{
    AddressDraft, EmailAddress, Error, IdentityValidationError, Password, PersonName,
    ProfileImageRef, Role, Username,
};

/// Raw signup input as submitted by a client.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationForm<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub line1: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub pincode: Option<&'a str>,
    pub profile_picture: Option<&'a str>,
}

/// A signup field that failed shape validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct RegistrationValidationError {
    /// Request field name as submitted by clients.
    pub field: &'static str,
    /// Human-readable reason.
    pub message: String,
}

fn invalid(field: &'static str, err: impl ToString) -> RegistrationValidationError {
    RegistrationValidationError {
        field,
        message: err.to_string(),
    }
}

impl From<RegistrationValidationError> for Error {
    fn from(value: RegistrationValidationError) -> Self {
        Self::invalid_request(value.message).with_details(json!({
            "field": value.field,
            "code": "invalid_field",
        }))
    }
}

/// Owned signup input.
///
/// Nothing is validated on construction: the registration checks run in a
/// fixed order against the raw values, and field shapes are validated only
/// once those checks pass.
#[derive(Clone)]
pub struct RegistrationRequest {
    username: String,
    email: String,
    password: Zeroizing<String>,
    confirm_password: Zeroizing<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    line1: Option<String>,
    city: Option<String>,
    state: Option<String>,
    pincode: Option<String>,
    profile_picture: Option<String>,
}

impl From<RegistrationForm<'_>> for RegistrationRequest {
    fn from(form: RegistrationForm<'_>) -> Self {
        let owned = |value: Option<&str>| value.map(str::to_owned);
        Self {
            username: form.username.to_owned(),
            email: form.email.to_owned(),
            password: Zeroizing::new(form.password.to_owned()),
            confirm_password: Zeroizing::new(form.confirm_password.to_owned()),
            first_name: owned(form.first_name),
            last_name: owned(form.last_name),
            line1: owned(form.line1),
            city: owned(form.city),
            state: owned(form.state),
            pincode: owned(form.pincode),
            profile_picture: owned(form.profile_picture),
        }
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Signup input whose fields all passed shape validation.
#[derive(Debug, Clone)]
pub struct ValidRegistration {
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
    pub name: PersonName,
    /// Present only when every address field was supplied.
    pub address: Option<AddressDraft>,
    pub image: Option<ProfileImageRef>,
}

impl RegistrationRequest {
    /// Username exactly as submitted.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Email exactly as submitted.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether the password and its confirmation are identical, byte for byte.
    #[must_use]
    pub fn passwords_match(&self) -> bool {
        self.password.as_str() == self.confirm_password.as_str()
    }

    /// Username to look up for the duplicate check.
    ///
    /// `None` when the input could never have been stored, so it cannot be
    /// taken.
    fn lookup_username(&self) -> Option<Username> {
        Username::new(self.username.trim()).ok()
    }

    fn lookup_email(&self) -> Option<EmailAddress> {
        EmailAddress::new(&self.email).ok()
    }

    /// Validate every field shape.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{RegistrationForm, RegistrationRequest};
    ///
    /// let request = RegistrationRequest::from(RegistrationForm {
    ///     username: "ada",
    ///     email: "ada@example.com",
    ///     password: "pw",
    ///     confirm_password: "pw",
    ///     line1: Some("1 Main St"),
    ///     ..RegistrationForm::default()
    /// });
    /// let valid = request.validate().unwrap();
    /// assert!(valid.address.is_none());
    /// ```
    pub fn validate(&self) -> Result<ValidRegistration, RegistrationValidationError> {
        let username =
            Username::new(self.username.trim()).map_err(|err| invalid("username", err))?;
        let email = EmailAddress::new(&self.email).map_err(|err| invalid("email", err))?;
        let password =
            Password::new(self.password.as_str()).map_err(|err| invalid("password", err))?;
        let name = PersonName::new(
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default(),
        )
        .map_err(|err| {
            let field = match &err {
                IdentityValidationError::NameTooLong { field, .. } => *field,
                _ => "name",
            };
            invalid(field, err)
        })?;

        let address_parts = [
            self.line1.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.pincode.as_deref(),
        ];
        let [line1, city, state, pincode] = address_parts;
        let address = AddressDraft::from_parts(line1, city, state, pincode)
            .map_err(|err| invalid(err.field, &err))?;
        let any_address_field = address_parts
            .iter()
            .flatten()
            .any(|value| !value.trim().is_empty());
        if address.is_none() && any_address_field {
            debug!("incomplete address input ignored");
        }

        let image = self
            .profile_picture
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(ProfileImageRef::new)
            .transpose()
            .map_err(|err| invalid("profilePicture", err))?;

        Ok(ValidRegistration {
            username,
            email,
            password,
            name,
            address,
            image,
        })
    }
}

/// Registration failures, in check order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
    /// Username is already taken.
    #[error("Username already exists")]
    DuplicateUsername,
    /// Email is already registered.
    #[error("Email already exists")]
    DuplicateEmail,
    /// A field failed shape validation after the ordered checks passed.
    #[error("{}", .0.message)]
    InvalidField(RegistrationValidationError),
    /// Any other failure; nothing was persisted.
    #[error("Error creating account: {cause}")]
    RegistrationFailed { cause: String },
}

impl RegistrationError {
    fn failed(cause: impl ToString) -> Self {
        Self::RegistrationFailed {
            cause: cause.to_string(),
        }
    }
}

impl From<IdentityStoreError> for RegistrationError {
    fn from(value: IdentityStoreError) -> Self {
        Self::failed(value)
    }
}

impl From<AccountRepositoryError> for RegistrationError {
    fn from(value: AccountRepositoryError) -> Self {
        match value {
            AccountRepositoryError::DuplicateUsername => Self::DuplicateUsername,
            AccountRepositoryError::DuplicateEmail => Self::DuplicateEmail,
            other => Self::failed(other),
        }
    }
}

impl From<RegistrationError> for Error {
    fn from(value: RegistrationError) -> Self {
        let message = value.to_string();
        match value {
            RegistrationError::PasswordMismatch => Self::invalid_request(message)
                .with_details(json!({ "field": "confirmPassword", "code": "password_mismatch" })),
            RegistrationError::DuplicateUsername => Self::conflict(message)
                .with_details(json!({ "field": "username", "code": "duplicate_username" })),
            RegistrationError::DuplicateEmail => Self::conflict(message)
                .with_details(json!({ "field": "email", "code": "duplicate_email" })),
            RegistrationError::InvalidField(err) => Self::from(err),
            RegistrationError::RegistrationFailed { .. } => Self::internal(message),
        }
    }
}

/// Registration service implementing [`RegistrationCommand`].
#[derive(Clone)]
pub struct RegistrationService<I, A> {
    identities: Arc<I>,
    accounts: Arc<A>,
}

impl<I, A> RegistrationService<I, A> {
    /// Create a service over the given stores.
    pub const fn new(identities: Arc<I>, accounts: Arc<A>) -> Self {
        Self {
            identities,
            accounts,
        }
    }
}

impl<I, A> RegistrationService<I, A>
where
    I: IdentityStore,
    A: AccountRepository,
{
    async fn check(
        &self,
        request: &RegistrationRequest,
    ) -> Result<ValidRegistration, RegistrationError> {
        if !request.passwords_match() {
            return Err(RegistrationError::PasswordMismatch);
        }
        if let Some(username) = request.lookup_username() {
            if self.identities.find_by_username(&username).await?.is_some() {
                return Err(RegistrationError::DuplicateUsername);
            }
        }
        if let Some(email) = request.lookup_email() {
            if self.identities.find_by_email(&email).await?.is_some() {
                return Err(RegistrationError::DuplicateEmail);
            }
        }
        request.validate().map_err(RegistrationError::InvalidField)
    }
}

#[async_trait]
impl<I, A> RegistrationCommand for RegistrationService<I, A>
where
    I: IdentityStore,
    A: AccountRepository,
{
    async fn register(
        &self,
        role: Role,
        request: RegistrationRequest,
    ) -> Result<RegisteredAccount, RegistrationError> {
        let ValidRegistration {
            username,
            email,
            password,
            name,
            address,
            image,
        } = self.check(&request).await?;
        let account = NewAccount {
            role,
            username,
            email,
            password,
            name,
            address,
            image,
        };

        match self.accounts.create_account(account).await {
            Ok(registered) => {
                info!(
                    identity_id = %registered.identity.id(),
                    %role,
                    with_address = registered.address.is_some(),
                    "account registered"
                );
                Ok(registered)
            }
            Err(err) => {
                let mapped = RegistrationError::from(err);
                if let RegistrationError::RegistrationFailed { cause } = &mapped {
                    warn!(%role, %cause, "account write rolled back");
                }
                Err(mapped)
            }
        }
    }
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;
