use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::registration::{
    NewRegistration as DomainNewRegistration, Registration as DomainRegistration,
};
use crate::domain::types::{
    AttendanceStatus, EnrollmentStatus, ParticipantEmail, ParticipantName, TypeConstraintError,
};

/// Diesel model representing the `registrations` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::registrations)]
pub struct Registration {
    pub id: i32,
    pub training_id: i32,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub registered_at: NaiveDateTime,
    pub status: String,
    pub attendance_status: String,
    pub notes: Option<String>,
    pub notified_at: Option<NaiveDateTime>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::registrations)]
pub struct NewRegistration {
    pub training_id: i32,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub registered_at: NaiveDateTime,
    pub status: String,
    pub attendance_status: String,
    pub notes: Option<String>,
}

/// Full-row changeset; `None` values are written as NULL.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::registrations, treat_none_as_null = true)]
pub struct RegistrationChangeset {
    pub training_id: i32,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub status: String,
    pub attendance_status: String,
    pub notes: Option<String>,
    pub notified_at: Option<NaiveDateTime>,
}

impl TryFrom<Registration> for DomainRegistration {
    type Error = TypeConstraintError;

    fn try_from(registration: Registration) -> Result<Self, Self::Error> {
        Ok(Self {
            id: registration.id.try_into()?,
            training_id: registration.training_id.try_into()?,
            participant_name: ParticipantName::new(registration.participant_name)?,
            participant_email: ParticipantEmail::new(registration.participant_email)?,
            participant_phone: registration.participant_phone,
            registered_at: registration.registered_at,
            status: EnrollmentStatus::try_from(registration.status)?,
            attendance_status: AttendanceStatus::try_from(registration.attendance_status)?,
            notes: registration.notes,
            notified_at: registration.notified_at,
        })
    }
}

impl From<DomainNewRegistration> for NewRegistration {
    fn from(registration: DomainNewRegistration) -> Self {
        Self {
            training_id: registration.training_id.get(),
            participant_name: registration.participant_name.into_inner(),
            participant_email: registration.participant_email.into_inner(),
            participant_phone: registration.participant_phone,
            registered_at: registration.registered_at,
            status: registration.status.into(),
            attendance_status: registration.attendance_status.into(),
            notes: registration.notes,
        }
    }
}

impl From<&DomainRegistration> for RegistrationChangeset {
    fn from(registration: &DomainRegistration) -> Self {
        Self {
            training_id: registration.training_id.get(),
            participant_name: registration.participant_name.as_str().to_string(),
            participant_email: registration.participant_email.as_str().to_string(),
            participant_phone: registration.participant_phone.clone(),
            status: registration.status.into(),
            attendance_status: registration.attendance_status.into(),
            notes: registration.notes.clone(),
            notified_at: registration.notified_at,
        }
    }
}
