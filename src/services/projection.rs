//! Filtered and sorted views over registrations, plus flat export rows.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::category::Category;
use crate::domain::registration::Registration;
use crate::domain::training::Training;
use crate::domain::types::{AttendanceStatus, CategoryId, EnrollmentStatus, TrainingId};

/// Criteria combined with AND. `None` leaves a dimension unfiltered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFilters {
    /// Case-insensitive substring of participant name or e-mail.
    pub search: Option<String>,
    pub status: Option<EnrollmentStatus>,
    pub attendance: Option<AttendanceStatus>,
    pub training_id: Option<TrainingId>,
    pub category_id: Option<CategoryId>,
}

impl RegistrationFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    ParticipantName,
    #[default]
    RegisteredAt,
    Status,
    AttendanceStatus,
}

impl SortField {
    pub const ALL: &'static [SortField] = &[
        Self::ParticipantName,
        Self::RegisteredAt,
        Self::Status,
        Self::AttendanceStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ParticipantName => "name",
            Self::RegisteredAt => "registered_at",
            Self::Status => "status",
            Self::AttendanceStatus => "attendance",
        }
    }

    /// Unknown values fall back to the default order.
    pub fn parse(value: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == value.trim())
            .unwrap_or_default()
    }

    fn compare(self, a: &Registration, b: &Registration) -> Ordering {
        match self {
            Self::ParticipantName => a.participant_name.cmp(&b.participant_name),
            Self::RegisteredAt => a.registered_at.cmp(&b.registered_at),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::AttendanceStatus => a
                .attendance_status
                .as_str()
                .cmp(b.attendance_status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "asc" => Self::Asc,
            _ => Self::Desc,
        }
    }
}

fn matches_search(registration: &Registration, needle: &str) -> bool {
    registration
        .participant_name
        .to_lowercase()
        .contains(needle)
        || registration
            .participant_email
            .to_lowercase()
            .contains(needle)
}

/// Filter and sort registrations without touching the input order.
///
/// A category filter is resolved to the set of its trainings first. The sort
/// is stable, so ties keep their input order.
pub fn project<'a>(
    registrations: &'a [Registration],
    trainings: &[Training],
    filters: &RegistrationFilters,
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a Registration> {
    let needle = filters
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let category_trainings: Option<HashSet<TrainingId>> = filters.category_id.map(|category_id| {
        trainings
            .iter()
            .filter(|t| t.category_id == category_id)
            .map(|t| t.id)
            .collect()
    });

    let mut items: Vec<&Registration> = registrations
        .iter()
        .filter(|r| needle.as_deref().is_none_or(|n| matches_search(r, n)))
        .filter(|r| filters.status.is_none_or(|s| r.status == s))
        .filter(|r| filters.attendance.is_none_or(|a| r.attendance_status == a))
        .filter(|r| filters.training_id.is_none_or(|t| r.training_id == t))
        .filter(|r| {
            category_trainings
                .as_ref()
                .is_none_or(|ids| ids.contains(&r.training_id))
        })
        .collect();

    match direction {
        SortDirection::Asc => items.sort_by(|a, b| field.compare(a, b)),
        SortDirection::Desc => items.sort_by(|a, b| field.compare(b, a)),
    }
    items
}

/// One registration flattened into human-readable cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    pub participant_name: String,
    pub participant_email: String,
    pub participant_phone: String,
    pub training_name: String,
    pub category_name: String,
    pub training_date: String,
    pub registered_at: String,
    pub status: String,
    pub attendance: String,
    pub notes: String,
}

impl ExportRow {
    pub const HEADERS: [&'static str; 10] = [
        "Participant",
        "Email",
        "Phone",
        "Training",
        "Category",
        "Training date",
        "Registered at",
        "Status",
        "Attendance",
        "Notes",
    ];

    pub fn into_cells(self) -> Vec<String> {
        vec![
            self.participant_name,
            self.participant_email,
            self.participant_phone,
            self.training_name,
            self.category_name,
            self.training_date,
            self.registered_at,
            self.status,
            self.attendance,
            self.notes,
        ]
    }
}

/// Map registrations to export rows. Deleted trainings or categories leave
/// their cells empty.
pub fn export_rows(
    registrations: &[&Registration],
    trainings: &[Training],
    categories: &[Category],
) -> Vec<ExportRow> {
    registrations
        .iter()
        .map(|registration| {
            let training = trainings.iter().find(|t| t.id == registration.training_id);
            let category = training
                .and_then(|t| categories.iter().find(|c| c.id == t.category_id));

            ExportRow {
                participant_name: registration.participant_name.to_string(),
                participant_email: registration.participant_email.to_string(),
                participant_phone: registration.participant_phone.clone().unwrap_or_default(),
                training_name: training.map(|t| t.name.to_string()).unwrap_or_default(),
                category_name: category.map(|c| c.name.to_string()).unwrap_or_default(),
                training_date: training
                    .map(|t| t.date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                registered_at: registration
                    .registered_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string(),
                status: registration.status.label().to_string(),
                attendance: registration.attendance_status.label().to_string(),
                notes: registration.notes.clone().unwrap_or_default(),
            }
        })
        .collect()
}
