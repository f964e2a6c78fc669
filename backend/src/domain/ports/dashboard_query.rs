//! Port for dashboard activity, plus the sample adapter used by the portal.
//!
//! The portal has no appointment or prescription model yet, so every
//! deployment serves [`SampleDashboardQuery`].

use async_trait::async_trait;

use crate::domain::{
    DoctorActivity, IdentityId, MedicalRecord, PatientActivity, PatientAppointment,
    PatientSummary, PendingPrescription, Prescription, ScheduledVisit, UpcomingVisit,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dashboard query adapters.
    pub enum DashboardQueryError {
        /// Source connection could not be established.
        Connection { message: String } => "dashboard query connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "dashboard query failed: {message}",
    }
}

/// Read-side port supplying raw dashboard activity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Activity visible to a patient.
    async fn patient_activity(
        &self,
        identity: IdentityId,
    ) -> Result<PatientActivity, DashboardQueryError>;

    /// Activity visible to a doctor.
    async fn doctor_activity(
        &self,
        identity: IdentityId,
    ) -> Result<DoctorActivity, DashboardQueryError>;
}

/// Static placeholder activity, identical for every identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleDashboardQuery;

fn s(value: &str) -> String {
    value.to_owned()
}

#[async_trait]
impl DashboardQuery for SampleDashboardQuery {
    async fn patient_activity(
        &self,
        _identity: IdentityId,
    ) -> Result<PatientActivity, DashboardQueryError> {
        Ok(PatientActivity {
            appointments: vec![
                PatientAppointment {
                    id: 1,
                    doctor_name: s("Dr. Smith"),
                    date: s("2024-06-15"),
                    time: s("10:30 AM"),
                    status: s("Confirmed"),
                    kind: s("General Checkup"),
                },
                PatientAppointment {
                    id: 2,
                    doctor_name: s("Dr. Johnson"),
                    date: s("2024-06-20"),
                    time: s("2:00 PM"),
                    status: s("Pending"),
                    kind: s("Cardiology"),
                },
            ],
            records: vec![
                MedicalRecord {
                    id: 1,
                    date: s("2024-06-10"),
                    doctor: s("Dr. Smith"),
                    diagnosis: s("Routine Checkup"),
                    prescription: s("Multivitamins"),
                },
                MedicalRecord {
                    id: 2,
                    date: s("2024-05-28"),
                    doctor: s("Dr. Brown"),
                    diagnosis: s("Mild Fever"),
                    prescription: s("Paracetamol 500mg"),
                },
            ],
            prescriptions: vec![
                Prescription {
                    id: 1,
                    medicine: s("Paracetamol 500mg"),
                    dosage: s("Twice daily"),
                    prescribed_by: s("Dr. Brown"),
                    date: s("2024-05-28"),
                    status: s("Active"),
                },
                Prescription {
                    id: 2,
                    medicine: s("Multivitamins"),
                    dosage: s("Once daily"),
                    prescribed_by: s("Dr. Smith"),
                    date: s("2024-06-10"),
                    status: s("Active"),
                },
            ],
        })
    }

    async fn doctor_activity(
        &self,
        _identity: IdentityId,
    ) -> Result<DoctorActivity, DashboardQueryError> {
        Ok(DoctorActivity {
            today: vec![
                ScheduledVisit {
                    id: 1,
                    patient_name: s("John Doe"),
                    time: s("10:30 AM"),
                    kind: s("General Checkup"),
                    status: s("Confirmed"),
                },
                ScheduledVisit {
                    id: 2,
                    patient_name: s("Jane Smith"),
                    time: s("2:00 PM"),
                    kind: s("Follow-up"),
                    status: s("Confirmed"),
                },
                ScheduledVisit {
                    id: 3,
                    patient_name: s("Mike Johnson"),
                    time: s("4:30 PM"),
                    kind: s("Consultation"),
                    status: s("Pending"),
                },
            ],
            recent_patients: vec![
                PatientSummary {
                    id: 1,
                    name: s("John Doe"),
                    last_visit: s("2024-06-14"),
                    condition: s("Hypertension"),
                    status: s("Under Treatment"),
                },
                PatientSummary {
                    id: 2,
                    name: s("Jane Smith"),
                    last_visit: s("2024-06-13"),
                    condition: s("Diabetes"),
                    status: s("Stable"),
                },
                PatientSummary {
                    id: 3,
                    name: s("Mike Johnson"),
                    last_visit: s("2024-06-12"),
                    condition: s("Routine Checkup"),
                    status: s("Healthy"),
                },
            ],
            pending_prescriptions: vec![
                PendingPrescription {
                    id: 1,
                    patient: s("John Doe"),
                    medicine: s("Lisinopril 10mg"),
                    date: s("2024-06-14"),
                    status: s("To be reviewed"),
                },
                PendingPrescription {
                    id: 2,
                    patient: s("Jane Smith"),
                    medicine: s("Metformin 500mg"),
                    date: s("2024-06-13"),
                    status: s("Active"),
                },
            ],
            upcoming: vec![
                UpcomingVisit {
                    id: 4,
                    patient_name: s("Sarah Wilson"),
                    date: s("2024-06-15"),
                    time: s("9:00 AM"),
                    kind: s("Consultation"),
                },
                UpcomingVisit {
                    id: 5,
                    patient_name: s("Robert Brown"),
                    date: s("2024-06-15"),
                    time: s("11:30 AM"),
                    kind: s("Follow-up"),
                },
            ],
        })
    }
}
