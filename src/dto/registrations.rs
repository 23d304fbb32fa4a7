use serde::Serialize;

use crate::domain::lifecycle::allowed_attendance;
use crate::domain::registration::Registration;
use crate::domain::training::Training;
use crate::dto::OptionDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationDto {
    pub id: i32,
    pub training_id: i32,
    /// Empty when the training was deleted.
    pub training_name: String,
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: Option<String>,
    pub registered_at: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub attendance_status: &'static str,
    pub attendance_label: &'static str,
    pub notes: Option<String>,
    pub notified_at: Option<String>,
    /// Current status plus every status reachable from it.
    pub status_options: Vec<OptionDto>,
    pub attendance_options: Vec<OptionDto>,
}

impl RegistrationDto {
    pub fn new(registration: &Registration, trainings: &[Training]) -> Self {
        let training = trainings.iter().find(|t| t.id == registration.training_id);

        let status_options = std::iter::once(registration.status)
            .chain(registration.status.allowed_next().iter().copied())
            .map(|status| OptionDto {
                value: status.as_str(),
                label: status.label(),
                requires_confirmation: status != registration.status
                    && status.requires_confirmation(),
            })
            .collect();

        let attendance_options =
            allowed_attendance(registration.status, training.map(|t| t.status))
                .into_iter()
                .map(|attendance| OptionDto {
                    value: attendance.as_str(),
                    label: attendance.label(),
                    requires_confirmation: false,
                })
                .collect();

        Self {
            id: registration.id.get(),
            training_id: registration.training_id.get(),
            training_name: training.map(|t| t.name.to_string()).unwrap_or_default(),
            participant_name: registration.participant_name.to_string(),
            participant_email: registration.participant_email.to_string(),
            participant_phone: registration.participant_phone.clone(),
            registered_at: registration
                .registered_at
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            status: registration.status.as_str(),
            status_label: registration.status.label(),
            attendance_status: registration.attendance_status.as_str(),
            attendance_label: registration.attendance_status.label(),
            notes: registration.notes.clone(),
            notified_at: registration
                .notified_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string()),
            status_options,
            attendance_options,
        }
    }
}
