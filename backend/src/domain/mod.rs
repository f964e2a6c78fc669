//! Domain entities, ports and services.
//!
//! Purpose: keep portal rules transport agnostic. Inbound adapters turn
//! requests into the validated types exported here and call the driving
//! ports in [`ports`]; outbound adapters implement the driven ports.
//!
//! Public surface:
//! - Error (alias to `error::Error`) - API error response payload.
//! - [`RegistrationService`], [`AuthenticationGate`], [`DashboardService`]:
//!   the three use-case services.

pub mod address;
pub mod authentication;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod ports;
pub mod profile;
pub mod registration;
pub mod trace_id;

pub use self::address::{Address, AddressDraft, AddressId, AddressValidationError};
pub use self::authentication::{
    AuthenticationGate, LoginAttempt, LoginCredentials, LoginError, LoginValidationError,
    Password, Principal,
};
pub use self::dashboard::{
    Dashboard, DashboardError, DashboardService, DoctorActivity, DoctorDashboard, DoctorStats,
    MedicalRecord, PatientActivity, PatientAppointment, PatientDashboard, PatientStats,
    PatientSummary, PendingPrescription, Prescription, ScheduledVisit, UpcomingVisit,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{
    EmailAddress, Identity, IdentityId, IdentityValidationError, PersonName, Username,
};
pub use self::profile::{
    Profile, ProfileId, ProfileImageError, ProfileImageRef, Role, UnknownRole,
};
pub use self::registration::{
    RegistrationError, RegistrationForm, RegistrationRequest, RegistrationService,
    RegistrationValidationError, ValidRegistration,
};
pub use self::trace_id::TraceId;

/// Convenient result alias for HTTP-facing code.
///
/// # Examples
/// ```
/// use portal::domain::{ApiResult, Error};
///
/// fn guarded() -> ApiResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// assert!(guarded().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
