//! Role dashboards.
//!
//! Dashboard content comes from a [`DashboardQuery`] adapter; the service
//! only checks that the caller may see the dashboard, caps the lists, and
//! derives the headline counters.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::ports::{
    DashboardAccess, DashboardQuery, DashboardQueryError, IdentityStore, IdentityStoreError,
    ProfileStore, ProfileStoreError,
};
use crate::domain::{Error, Principal, Role};

/// Most recent patient entries shown per list.
pub const PATIENT_LIST_LIMIT: usize = 3;
/// Most recent patients shown on the doctor dashboard.
pub const RECENT_PATIENTS_LIMIT: usize = 5;
/// Upcoming appointments shown on the doctor dashboard.
pub const UPCOMING_LIMIT: usize = 3;
/// Added to the recent patient count to form the patient total.
pub const PATIENT_BASELINE: usize = 15;
/// Completed appointment count reported for today.
pub const COMPLETED_TODAY: usize = 2;

/// Appointment booked by a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientAppointment {
    pub id: u32,
    pub doctor_name: String,
    pub date: String,
    pub time: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Entry in a patient's medical history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: u32,
    pub date: String,
    pub doctor: String,
    pub diagnosis: String,
    pub prescription: String,
}

/// Prescription issued to a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: u32,
    pub medicine: String,
    pub dosage: String,
    pub prescribed_by: String,
    pub date: String,
    pub status: String,
}

/// Appointment on a doctor's schedule for today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVisit {
    pub id: u32,
    pub patient_name: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
}

/// Patient recently seen by a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub id: u32,
    pub name: String,
    pub last_visit: String,
    pub condition: String,
    pub status: String,
}

/// Prescription awaiting the doctor's review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingPrescription {
    pub id: u32,
    pub patient: String,
    pub medicine: String,
    pub date: String,
    pub status: String,
}

/// Appointment on a later day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingVisit {
    pub id: u32,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Raw patient activity returned by [`DashboardQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientActivity {
    pub appointments: Vec<PatientAppointment>,
    pub records: Vec<MedicalRecord>,
    pub prescriptions: Vec<Prescription>,
}

/// Raw doctor activity returned by [`DashboardQuery`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorActivity {
    pub today: Vec<ScheduledVisit>,
    pub recent_patients: Vec<PatientSummary>,
    pub pending_prescriptions: Vec<PendingPrescription>,
    pub upcoming: Vec<UpcomingVisit>,
}

/// Patient headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientStats {
    pub total_appointments: usize,
    pub upcoming_appointments: usize,
    pub total_prescriptions: usize,
    pub active_prescriptions: usize,
}

/// Doctor headline counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStats {
    pub today_appointments: usize,
    pub total_patients: usize,
    pub pending_reviews: usize,
    pub completed_today: usize,
}

/// Patient dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientDashboard {
    pub display_name: String,
    pub recent_appointments: Vec<PatientAppointment>,
    pub medical_records: Vec<MedicalRecord>,
    pub prescriptions: Vec<Prescription>,
    pub stats: PatientStats,
}

impl PatientDashboard {
    /// Derive counters from the full lists, then cap each list.
    #[must_use]
    pub fn assemble(display_name: String, activity: PatientActivity) -> Self {
        let PatientActivity {
            appointments,
            records,
            prescriptions,
        } = activity;
        let stats = PatientStats {
            total_appointments: appointments.len(),
            upcoming_appointments: appointments
                .iter()
                .filter(|a| a.status == "Confirmed")
                .count(),
            total_prescriptions: prescriptions.len(),
            active_prescriptions: prescriptions
                .iter()
                .filter(|p| p.status == "Active")
                .count(),
        };
        Self {
            display_name,
            recent_appointments: capped(appointments, PATIENT_LIST_LIMIT),
            medical_records: capped(records, PATIENT_LIST_LIMIT),
            prescriptions: capped(prescriptions, PATIENT_LIST_LIMIT),
            stats,
        }
    }
}

/// Doctor dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub display_name: String,
    pub today_appointments: Vec<ScheduledVisit>,
    pub recent_patients: Vec<PatientSummary>,
    pub pending_prescriptions: Vec<PendingPrescription>,
    pub upcoming_appointments: Vec<UpcomingVisit>,
    pub stats: DoctorStats,
}

impl DoctorDashboard {
    /// Derive counters from the full lists, then cap the bounded lists.
    #[must_use]
    pub fn assemble(display_name: String, activity: DoctorActivity) -> Self {
        let DoctorActivity {
            today,
            recent_patients,
            pending_prescriptions,
            upcoming,
        } = activity;
        let stats = DoctorStats {
            today_appointments: today.len(),
            total_patients: recent_patients.len() + PATIENT_BASELINE,
            pending_reviews: pending_prescriptions.len(),
            completed_today: COMPLETED_TODAY,
        };
        Self {
            display_name,
            today_appointments: today,
            recent_patients: capped(recent_patients, RECENT_PATIENTS_LIMIT),
            pending_prescriptions,
            upcoming_appointments: capped(upcoming, UPCOMING_LIMIT),
            stats,
        }
    }
}

fn capped<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    items.truncate(limit);
    items
}

/// Dashboard for either role, tagged by `role` when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Patient(PatientDashboard),
    Doctor(DoctorDashboard),
}

/// Reasons a dashboard cannot be shown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    /// No profile of the requested role is bound to the session.
    #[error("{} profile not found", .role.title())]
    ProfileNotFound { role: Role },
    /// A backing store could not be reached.
    #[error("dashboard store unavailable: {message}")]
    Unavailable { message: String },
    /// A backing store failed unexpectedly.
    #[error("dashboard store failure: {message}")]
    StoreFailure { message: String },
}

impl From<IdentityStoreError> for DashboardError {
    fn from(value: IdentityStoreError) -> Self {
        match value {
            IdentityStoreError::Connection { message } => Self::Unavailable { message },
            IdentityStoreError::Query { message } => Self::StoreFailure { message },
        }
    }
}

impl From<ProfileStoreError> for DashboardError {
    fn from(value: ProfileStoreError) -> Self {
        match value {
            ProfileStoreError::Connection { message } => Self::Unavailable { message },
            ProfileStoreError::Query { message } => Self::StoreFailure { message },
        }
    }
}

impl From<DashboardQueryError> for DashboardError {
    fn from(value: DashboardQueryError) -> Self {
        match value {
            DashboardQueryError::Connection { message } => Self::Unavailable { message },
            DashboardQueryError::Query { message } => Self::StoreFailure { message },
        }
    }
}

impl From<DashboardError> for Error {
    fn from(value: DashboardError) -> Self {
        match value {
            DashboardError::ProfileNotFound { .. } => {
                Self::not_found(value.to_string()).with_details(json!({ "redirect": "/" }))
            }
            DashboardError::Unavailable { .. } => Self::service_unavailable(value.to_string()),
            DashboardError::StoreFailure { .. } => Self::internal(value.to_string()),
        }
    }
}

/// Dashboard service implementing [`DashboardAccess`].
#[derive(Clone)]
pub struct DashboardService<I, P, Q> {
    identities: Arc<I>,
    profiles: Arc<P>,
    query: Arc<Q>,
}

impl<I, P, Q> DashboardService<I, P, Q> {
    /// Create a service over the given stores and query adapter.
    pub const fn new(identities: Arc<I>, profiles: Arc<P>, query: Arc<Q>) -> Self {
        Self {
            identities,
            profiles,
            query,
        }
    }
}

#[async_trait]
impl<I, P, Q> DashboardAccess for DashboardService<I, P, Q>
where
    I: IdentityStore,
    P: ProfileStore,
    Q: DashboardQuery,
{
    async fn dashboard(
        &self,
        principal: Principal,
        role: Role,
    ) -> Result<Dashboard, DashboardError> {
        let not_found = DashboardError::ProfileNotFound { role };
        if principal.role() != role {
            debug!(session_role = %principal.role(), %role, "dashboard role mismatch");
            return Err(not_found);
        }

        let identity_id = principal.identity_id();
        if self.profiles.find_profile(role, identity_id).await?.is_none() {
            return Err(not_found);
        }
        let Some(identity) = self.identities.find_by_id(identity_id).await? else {
            return Err(not_found);
        };

        let display_name = identity.display_name();
        Ok(match role {
            Role::Patient => {
                let activity = self.query.patient_activity(identity_id).await?;
                Dashboard::Patient(PatientDashboard::assemble(display_name, activity))
            }
            Role::Doctor => {
                let activity = self.query.doctor_activity(identity_id).await?;
                Dashboard::Doctor(DoctorDashboard::assemble(display_name, activity))
            }
        })
    }
}
