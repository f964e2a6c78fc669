//! Postal addresses attached to profiles.
//!
//! Address input is all-or-nothing: unless every field is present and
//! non-blank the draft collapses to "no address".

use std::fmt;

use uuid::Uuid;

/// Maximum length of the first address line.
pub const LINE1_MAX: usize = 255;
/// Maximum length of the city and state fields.
pub const REGION_MAX: usize = 100;
/// Maximum length of the postal code.
pub const POSTAL_CODE_MAX: usize = 10;

/// Validation errors for complete address input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be at most {max} characters")]
pub struct AddressValidationError {
    /// Request field that exceeded its limit.
    pub field: &'static str,
    /// Limit in characters.
    pub max: usize,
}

/// Address identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressId(Uuid);

impl AddressId {
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

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Complete address fields ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDraft {
    line1: String,
    city: String,
    state: String,
    postal_code: String,
}

impl AddressDraft {
    /// Build a draft from optional request fields.
    ///
    /// Returns `Ok(None)` when any field is missing or blank. Returns an error
    /// only when all fields are present and one exceeds its length limit.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::AddressDraft;
    ///
    /// let partial = AddressDraft::from_parts(Some("1 Main St"), Some("Leeds"), None, Some(""));
    /// assert_eq!(partial, Ok(None));
    /// ```
    pub fn from_parts(
        line1: Option<&str>,
        city: Option<&str>,
        state: Option<&str>,
        postal_code: Option<&str>,
    ) -> Result<Option<Self>, AddressValidationError> {
        let (Some(line1), Some(city), Some(state), Some(postal_code)) = (
            present(line1),
            present(city),
            present(state),
            present(postal_code),
        ) else {
            return Ok(None);
        };

        Ok(Some(Self {
            line1: bounded("line1", line1, LINE1_MAX)?,
            city: bounded("city", city, REGION_MAX)?,
            state: bounded("state", state, REGION_MAX)?,
            postal_code: bounded("pincode", postal_code, POSTAL_CODE_MAX)?,
        }))
    }

    /// First address line.
    #[must_use]
    pub fn line1(&self) -> &str {
        &self.line1
    }

    /// City.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// State or region.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Postal code.
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, AddressValidationError> {
    if value.chars().count() > max {
        return Err(AddressValidationError { field, max });
    }
    Ok(value.to_owned())
}

/// A stored address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    id: AddressId,
    fields: AddressDraft,
}

impl Address {
    /// Attach an identifier to stored fields.
    #[must_use]
    pub const fn new(id: AddressId, fields: AddressDraft) -> Self {
        Self { id, fields }
    }

    /// Identifier.
    #[must_use]
    pub const fn id(&self) -> AddressId {
        self.id
    }

    /// Stored fields.
    #[must_use]
    pub const fn fields(&self) -> &AddressDraft {
        &self.fields
    }
}
