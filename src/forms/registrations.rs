use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::registration::NewRegistration;
use crate::domain::types::{
    AttendanceStatus, CategoryId, EnrollmentStatus, ParticipantEmail, ParticipantName,
    RegistrationId, TrainingId, TypeConstraintError,
};
use crate::forms::{optional_id, optional_text};
use crate::services::bulk::{BulkAction, BulkError, BulkRequest, Confirmation};
use crate::services::export::{ExportError, ExportFormat};
use crate::services::projection::{RegistrationFilters, SortDirection, SortField};

#[derive(Debug, Error)]
pub enum RegistrationFormError {
    #[error("Registration form validation failed: {0}")]
    Validation(String),
    #[error("Registration form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("{0}")]
    Bulk(#[from] BulkError),
    #[error("{0}")]
    Export(#[from] ExportError),
}

impl From<ValidationErrors> for RegistrationFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RegistrationFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Participant sign-up submitted from a training page.
#[derive(Deserialize, Validate)]
pub struct SelfRegistrationForm {
    #[validate(length(min = 1, max = 200))]
    pub participant_name: String,
    #[validate(email)]
    pub participant_email: String,
    pub participant_phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelfRegistrationFormPayload {
    pub participant_name: ParticipantName,
    pub participant_email: ParticipantEmail,
    pub participant_phone: Option<String>,
}

impl SelfRegistrationFormPayload {
    pub fn into_new_registration(
        self,
        training_id: TrainingId,
        registered_at: NaiveDateTime,
    ) -> NewRegistration {
        NewRegistration::self_registration(
            training_id,
            self.participant_name,
            self.participant_email,
            self.participant_phone,
            registered_at,
        )
    }
}

impl TryFrom<SelfRegistrationForm> for SelfRegistrationFormPayload {
    type Error = RegistrationFormError;

    fn try_from(value: SelfRegistrationForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            participant_name: ParticipantName::new(value.participant_name)?,
            participant_email: ParticipantEmail::new(value.participant_email)?,
            participant_phone: optional_text(value.participant_phone),
        })
    }
}

/// Registration entered by an admin on behalf of a participant.
#[derive(Deserialize, Validate)]
pub struct AddRegistrationForm {
    #[validate(range(min = 1))]
    pub training_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub participant_name: String,
    #[validate(email)]
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddRegistrationFormPayload {
    pub training_id: TrainingId,
    pub participant_name: ParticipantName,
    pub participant_email: ParticipantEmail,
    pub participant_phone: Option<String>,
    pub status: EnrollmentStatus,
    pub notes: Option<String>,
}

impl AddRegistrationFormPayload {
    pub fn into_new_registration(self, registered_at: NaiveDateTime) -> NewRegistration {
        let mut registration = NewRegistration::self_registration(
            self.training_id,
            self.participant_name,
            self.participant_email,
            self.participant_phone,
            registered_at,
        );
        registration.status = self.status;
        registration.notes = self.notes;
        registration
    }
}

impl TryFrom<AddRegistrationForm> for AddRegistrationFormPayload {
    type Error = RegistrationFormError;

    fn try_from(value: AddRegistrationForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let status = match optional_text(value.status) {
            Some(status) => EnrollmentStatus::try_from(status)?,
            None => EnrollmentStatus::Registered,
        };
        Ok(Self {
            training_id: TrainingId::new(value.training_id)?,
            participant_name: ParticipantName::new(value.participant_name)?,
            participant_email: ParticipantEmail::new(value.participant_email)?,
            participant_phone: optional_text(value.participant_phone),
            status,
            notes: optional_text(value.notes),
        })
    }
}

/// Single status change with the optional reason from the confirmation step.
#[derive(Deserialize, Validate)]
pub struct ChangeStatusForm {
    #[validate(range(min = 1))]
    pub registration_id: i32,
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeStatusFormPayload {
    pub registration_id: RegistrationId,
    pub status: EnrollmentStatus,
    pub reason: Option<String>,
}

impl TryFrom<ChangeStatusForm> for ChangeStatusFormPayload {
    type Error = RegistrationFormError;

    fn try_from(value: ChangeStatusForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            registration_id: RegistrationId::new(value.registration_id)?,
            status: EnrollmentStatus::try_from(value.status)?,
            reason: optional_text(value.reason),
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct ChangeAttendanceForm {
    #[validate(range(min = 1))]
    pub registration_id: i32,
    pub attendance_status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeAttendanceFormPayload {
    pub registration_id: RegistrationId,
    pub attendance_status: AttendanceStatus,
}

impl TryFrom<ChangeAttendanceForm> for ChangeAttendanceFormPayload {
    type Error = RegistrationFormError;

    fn try_from(value: ChangeAttendanceForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            registration_id: RegistrationId::new(value.registration_id)?,
            attendance_status: AttendanceStatus::try_from(value.attendance_status)?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteRegistrationForm {
    #[validate(range(min = 1))]
    pub registration_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRegistrationFormPayload {
    pub registration_id: RegistrationId,
}

impl TryFrom<DeleteRegistrationForm> for DeleteRegistrationFormPayload {
    type Error = RegistrationFormError;

    fn try_from(value: DeleteRegistrationForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            registration_id: RegistrationId::new(value.registration_id)?,
        })
    }
}

/// Bulk action over the table selection.
///
/// `ids` is a comma separated list filled in by the page script. The
/// confirmation dialog sets `confirmed`.
#[derive(Deserialize, Validate)]
pub struct BulkActionForm {
    #[validate(length(min = 1))]
    pub action: String,
    #[serde(default)]
    pub ids: String,
    #[serde(default)]
    pub confirmed: Option<String>,
    pub reason: Option<String>,
}

impl TryFrom<BulkActionForm> for BulkRequest {
    type Error = RegistrationFormError;

    fn try_from(value: BulkActionForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let action = BulkAction::try_from(value.action.as_str())?;
        let ids = value
            .ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| {
                id.parse::<i32>()
                    .map_err(|_| TypeConstraintError::InvalidValue(format!("invalid id: {id}")))
                    .and_then(RegistrationId::new)
            })
            .collect::<Result<Vec<_>, _>>()?;
        // The page always posts the hidden field; only a non-blank value confirms.
        let confirmation = optional_text(value.confirmed).map(|_| Confirmation {
            reason: optional_text(value.reason),
        });

        Ok(Self {
            action,
            ids,
            confirmation,
        })
    }
}

/// Query string of the admin registrations table and its export link.
#[derive(Debug, Default, Deserialize)]
pub struct RegistrationListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub attendance: Option<String>,
    pub training_id: Option<String>,
    pub category_id: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub format: Option<String>,
}

/// Parsed table view options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationView {
    pub filters: RegistrationFilters,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl TryFrom<RegistrationListQuery> for RegistrationView {
    type Error = RegistrationFormError;

    /// Blank or unknown select values mean "any".
    fn try_from(value: RegistrationListQuery) -> Result<Self, Self::Error> {
        let filters = RegistrationFilters {
            search: optional_text(value.search),
            status: optional_text(value.status)
                .and_then(|s| EnrollmentStatus::try_from(s).ok()),
            attendance: optional_text(value.attendance)
                .and_then(|s| AttendanceStatus::try_from(s).ok()),
            training_id: optional_id(value.training_id)
                .map(TrainingId::new)
                .transpose()?,
            category_id: optional_id(value.category_id)
                .map(CategoryId::new)
                .transpose()?,
        };

        Ok(Self {
            filters,
            sort: value.sort.as_deref().map(SortField::parse).unwrap_or_default(),
            direction: value
                .direction
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
        })
    }
}

impl RegistrationListQuery {
    pub fn export_format(&self) -> Result<ExportFormat, RegistrationFormError> {
        match self.format.as_deref() {
            Some(format) => Ok(ExportFormat::try_from(format)?),
            None => Ok(ExportFormat::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_registration_trims_and_validates() {
        let form = SelfRegistrationForm {
            participant_name: " Jane Doe ".into(),
            participant_email: "jane@example.com".into(),
            participant_phone: Some("".into()),
        };

        let payload: SelfRegistrationFormPayload = form.try_into().unwrap();
        assert_eq!(payload.participant_name.as_str(), "Jane Doe");
        assert_eq!(payload.participant_phone, None);
    }

    #[test]
    fn self_registration_rejects_bad_email() {
        let form = SelfRegistrationForm {
            participant_name: "Jane".into(),
            participant_email: "not-an-email".into(),
            participant_phone: None,
        };

        let payload: Result<SelfRegistrationFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(RegistrationFormError::Validation(_))));
    }

    #[test]
    fn bulk_form_parses_ids_and_confirmation() {
        let form = BulkActionForm {
            action: "cancelled".into(),
            ids: "3, 5,,7".into(),
            confirmed: Some("1".into()),
            reason: Some(" Budget ".into()),
        };

        let request: BulkRequest = form.try_into().unwrap();
        assert_eq!(request.action, BulkAction::Status(EnrollmentStatus::Cancelled));
        assert_eq!(
            request.ids.iter().map(|id| id.get()).collect::<Vec<_>>(),
            vec![3, 5, 7]
        );
        assert_eq!(
            request.confirmation,
            Some(Confirmation {
                reason: Some("Budget".into())
            })
        );
    }

    #[test]
    fn bulk_form_without_confirmation_has_none() {
        let form = BulkActionForm {
            action: "notify".into(),
            ids: "1".into(),
            confirmed: None,
            reason: Some("ignored".into()),
        };

        let request: BulkRequest = form.try_into().unwrap();
        assert_eq!(request.confirmation, None);
    }

    #[test]
    fn blank_confirmed_field_does_not_confirm_a_delete() {
        let form = BulkActionForm {
            action: "delete".into(),
            ids: "1,2".into(),
            confirmed: Some(String::new()),
            reason: Some(String::new()),
        };

        let request: BulkRequest = form.try_into().unwrap();
        assert_eq!(request.action, BulkAction::Delete);
        assert_eq!(request.confirmation, None);
    }

    #[test]
    fn status_form_keeps_the_confirmation_reason() {
        let form = ChangeStatusForm {
            registration_id: 4,
            status: "on_hold".into(),
            reason: Some("  Waiting for budget ".into()),
        };

        let payload: ChangeStatusFormPayload = form.try_into().unwrap();
        assert_eq!(payload.status, EnrollmentStatus::OnHold);
        assert_eq!(payload.reason.as_deref(), Some("Waiting for budget"));
    }

    #[test]
    fn bulk_form_rejects_garbage_ids() {
        let form = BulkActionForm {
            action: "notify".into(),
            ids: "1,x".into(),
            confirmed: None,
            reason: None,
        };

        let request: Result<BulkRequest, _> = form.try_into();
        assert!(matches!(request, Err(RegistrationFormError::TypeConstraint(_))));
    }

    #[test]
    fn list_query_treats_blank_as_any() {
        let query = RegistrationListQuery {
            search: Some("".into()),
            status: Some("confirmed".into()),
            attendance: Some("".into()),
            training_id: Some("4".into()),
            category_id: Some("".into()),
            sort: Some("name".into()),
            direction: Some("asc".into()),
            format: None,
        };

        let view: RegistrationView = query.try_into().unwrap();
        assert_eq!(view.filters.search, None);
        assert_eq!(view.filters.status, Some(EnrollmentStatus::Confirmed));
        assert_eq!(view.filters.attendance, None);
        assert_eq!(view.filters.training_id, Some(TrainingId::new(4).unwrap()));
        assert_eq!(view.sort, SortField::ParticipantName);
        assert_eq!(view.direction, SortDirection::Asc);
    }
}
