use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    AttendanceStatus, EnrollmentStatus, ParticipantEmail, ParticipantName, RegistrationId,
    TrainingId,
};

/// A participant's enrollment in a training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub id: RegistrationId,
    pub training_id: TrainingId,
    pub participant_name: ParticipantName,
    pub participant_email: ParticipantEmail,
    pub participant_phone: Option<String>,
    pub registered_at: NaiveDateTime,
    pub status: EnrollmentStatus,
    pub attendance_status: AttendanceStatus,
    pub notes: Option<String>,
    /// Bookkeeping marker set by the notify bulk action.
    pub notified_at: Option<NaiveDateTime>,
}

/// Data required to insert a new [`Registration`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRegistration {
    pub training_id: TrainingId,
    pub participant_name: ParticipantName,
    pub participant_email: ParticipantEmail,
    pub participant_phone: Option<String>,
    pub registered_at: NaiveDateTime,
    pub status: EnrollmentStatus,
    pub attendance_status: AttendanceStatus,
    pub notes: Option<String>,
}

impl NewRegistration {
    /// A fresh self-registration: `registered` and attendance `pending`.
    pub fn self_registration(
        training_id: TrainingId,
        participant_name: ParticipantName,
        participant_email: ParticipantEmail,
        participant_phone: Option<String>,
        registered_at: NaiveDateTime,
    ) -> Self {
        Self {
            training_id,
            participant_name,
            participant_email,
            participant_phone,
            registered_at,
            status: EnrollmentStatus::Registered,
            attendance_status: AttendanceStatus::Pending,
            notes: None,
        }
    }

    /// Materializes the record once the store has assigned an id.
    pub fn with_id(self, id: RegistrationId) -> Registration {
        Registration {
            id,
            training_id: self.training_id,
            participant_name: self.participant_name,
            participant_email: self.participant_email,
            participant_phone: self.participant_phone,
            registered_at: self.registered_at,
            status: self.status,
            attendance_status: self.attendance_status,
            notes: self.notes,
            notified_at: None,
        }
    }
}
