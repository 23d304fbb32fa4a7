use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::training::NewTraining;
use crate::domain::types::{
    CategoryId, ExternalLink, FileUrl, RegistrationMethod, SlotCount, TrainingDescription,
    TrainingId, TrainingName, TrainingStatus, TypeConstraintError,
};
use crate::forms::{optional_text, parse_date, parse_optional_date, parse_optional_time};

#[derive(Debug, Error)]
pub enum TrainingFormError {
    #[error("Training form validation failed: {0}")]
    Validation(String),
    #[error("Training form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Available slots cannot exceed the maximum number of registrations")]
    SlotsExceedCapacity,
    #[error("External registration requires an external link")]
    MissingExternalLink,
}

impl From<ValidationErrors> for TrainingFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for TrainingFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Add/edit training form. Checkboxes are absent from the body when
/// unchecked.
#[derive(Deserialize, Validate)]
pub struct TrainingForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub short_description: Option<String>,
    #[validate(range(min = 1))]
    pub category_id: i32,
    pub date: String,
    pub end_date: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub duration: Option<String>,
    pub status: String,
    #[validate(range(min = 0))]
    pub available_slots: i32,
    #[validate(range(min = 0))]
    pub max_registrations: i32,
    pub registration_method: String,
    pub external_link: Option<String>,
    pub hero_image: Option<String>,
    #[serde(default)]
    pub is_featured: Option<String>,
    #[serde(default)]
    pub is_recommended: Option<String>,
    #[serde(default)]
    pub is_registration_open: Option<String>,
    pub display_order: Option<String>,
    /// One URL per line.
    #[serde(default)]
    pub attachments: String,
    pub location: Option<String>,
    pub speakers: Option<String>,
    pub target_audience: Option<String>,
}

/// Validated training fields. Timestamps are filled in by
/// [`TrainingFormPayload::into_new_training`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingFormPayload {
    pub name: TrainingName,
    pub description: TrainingDescription,
    pub short_description: Option<String>,
    pub category_id: CategoryId,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub time_from: Option<NaiveTime>,
    pub time_to: Option<NaiveTime>,
    pub duration: Option<String>,
    pub status: TrainingStatus,
    pub available_slots: SlotCount,
    pub max_registrations: SlotCount,
    pub registration_method: RegistrationMethod,
    pub external_link: Option<ExternalLink>,
    pub hero_image: Option<FileUrl>,
    pub is_featured: bool,
    pub is_recommended: bool,
    pub is_registration_open: bool,
    pub display_order: Option<i32>,
    pub attachments: Vec<FileUrl>,
    pub location: Option<String>,
    pub speakers: Option<String>,
    pub target_audience: Option<String>,
}

impl TrainingFormPayload {
    /// `created_at` is overwritten with the stored value on edits.
    pub fn into_new_training(self, now: NaiveDateTime) -> NewTraining {
        NewTraining {
            name: self.name,
            description: self.description,
            short_description: self.short_description,
            category_id: self.category_id,
            date: self.date,
            end_date: self.end_date,
            time_from: self.time_from,
            time_to: self.time_to,
            duration: self.duration,
            status: self.status,
            available_slots: self.available_slots,
            max_registrations: self.max_registrations,
            registration_method: self.registration_method,
            external_link: self.external_link,
            hero_image: self.hero_image,
            is_featured: self.is_featured,
            is_recommended: self.is_recommended,
            is_registration_open: self.is_registration_open,
            display_order: self.display_order,
            attachments: self.attachments,
            location: self.location,
            speakers: self.speakers,
            target_audience: self.target_audience,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TryFrom<TrainingForm> for TrainingFormPayload {
    type Error = TrainingFormError;

    fn try_from(value: TrainingForm) -> Result<Self, Self::Error> {
        value.validate()?;

        let available_slots = SlotCount::new(value.available_slots)?;
        let max_registrations = SlotCount::new(value.max_registrations)?;
        if available_slots.get() > max_registrations.get() {
            return Err(TrainingFormError::SlotsExceedCapacity);
        }

        let registration_method = RegistrationMethod::try_from(value.registration_method)?;
        let external_link = optional_text(value.external_link)
            .map(ExternalLink::new)
            .transpose()?;
        if registration_method == RegistrationMethod::External && external_link.is_none() {
            return Err(TrainingFormError::MissingExternalLink);
        }

        let display_order = optional_text(value.display_order)
            .map(|v| {
                v.parse::<i32>().map_err(|_| {
                    TypeConstraintError::InvalidValue("display order must be a number".into())
                })
            })
            .transpose()?;

        let attachments = value
            .attachments
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(FileUrl::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: TrainingName::new(value.name)?,
            description: TrainingDescription::new(value.description)?,
            short_description: optional_text(value.short_description),
            category_id: CategoryId::new(value.category_id)?,
            date: parse_date(&value.date, "date")?,
            end_date: parse_optional_date(value.end_date, "end date")?,
            time_from: parse_optional_time(value.time_from, "start time")?,
            time_to: parse_optional_time(value.time_to, "end time")?,
            duration: optional_text(value.duration),
            status: TrainingStatus::try_from(value.status)?,
            available_slots,
            max_registrations,
            registration_method,
            external_link,
            hero_image: optional_text(value.hero_image)
                .map(FileUrl::new)
                .transpose()?,
            is_featured: value.is_featured.is_some(),
            is_recommended: value.is_recommended.is_some(),
            is_registration_open: value.is_registration_open.is_some(),
            display_order,
            attachments,
            location: optional_text(value.location),
            speakers: optional_text(value.speakers),
            target_audience: optional_text(value.target_audience),
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteTrainingForm {
    #[validate(range(min = 1))]
    pub training_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteTrainingFormPayload {
    pub training_id: TrainingId,
}

impl TryFrom<DeleteTrainingForm> for DeleteTrainingFormPayload {
    type Error = TrainingFormError;

    fn try_from(value: DeleteTrainingForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            training_id: TrainingId::new(value.training_id)?,
        })
    }
}
