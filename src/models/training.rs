use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;

use crate::domain::training::{NewTraining as DomainNewTraining, Training as DomainTraining};
use crate::domain::types::{
    ExternalLink, FileUrl, RegistrationMethod, SlotCount, TrainingDescription, TrainingName,
    TrainingStatus, TypeConstraintError,
};

/// Diesel model representing the `trainings` table.
#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::trainings)]
pub struct Training {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category_id: i32,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub time_from: Option<NaiveTime>,
    pub time_to: Option<NaiveTime>,
    pub duration: Option<String>,
    pub status: String,
    pub available_slots: i32,
    pub max_registrations: i32,
    pub registration_method: String,
    pub external_link: Option<String>,
    pub hero_image: Option<String>,
    pub is_featured: bool,
    pub is_recommended: bool,
    pub is_registration_open: bool,
    pub display_order: Option<i32>,
    /// JSON array of attachment URLs.
    pub attachments: String,
    pub location: Option<String>,
    pub speakers: Option<String>,
    pub target_audience: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insertable and full-overwrite form of [`Training`].
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::trainings, treat_none_as_null = true)]
pub struct NewTraining {
    pub name: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category_id: i32,
    pub date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub time_from: Option<NaiveTime>,
    pub time_to: Option<NaiveTime>,
    pub duration: Option<String>,
    pub status: String,
    pub available_slots: i32,
    pub max_registrations: i32,
    pub registration_method: String,
    pub external_link: Option<String>,
    pub hero_image: Option<String>,
    pub is_featured: bool,
    pub is_recommended: bool,
    pub is_registration_open: bool,
    pub display_order: Option<i32>,
    pub attachments: String,
    pub location: Option<String>,
    pub speakers: Option<String>,
    pub target_audience: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn decode_attachments(raw: &str) -> Result<Vec<FileUrl>, TypeConstraintError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    let urls: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("attachments: {e}")))?;
    urls.into_iter().map(FileUrl::new).collect()
}

fn encode_attachments(attachments: Vec<FileUrl>) -> String {
    let urls: Vec<String> = attachments.into_iter().map(Into::into).collect();
    serde_json::to_string(&urls).unwrap_or_else(|_| "[]".to_string())
}

impl TryFrom<Training> for DomainTraining {
    type Error = TypeConstraintError;

    fn try_from(training: Training) -> Result<Self, Self::Error> {
        Ok(Self {
            id: training.id.try_into()?,
            name: TrainingName::new(training.name)?,
            description: TrainingDescription::new(training.description)?,
            short_description: training.short_description,
            category_id: training.category_id.try_into()?,
            date: training.date,
            end_date: training.end_date,
            time_from: training.time_from,
            time_to: training.time_to,
            duration: training.duration,
            status: TrainingStatus::try_from(training.status)?,
            available_slots: SlotCount::new(training.available_slots)?,
            max_registrations: SlotCount::new(training.max_registrations)?,
            registration_method: RegistrationMethod::try_from(training.registration_method)?,
            external_link: training.external_link.map(ExternalLink::new).transpose()?,
            hero_image: training.hero_image.map(FileUrl::new).transpose()?,
            is_featured: training.is_featured,
            is_recommended: training.is_recommended,
            is_registration_open: training.is_registration_open,
            display_order: training.display_order,
            attachments: decode_attachments(&training.attachments)?,
            location: training.location,
            speakers: training.speakers,
            target_audience: training.target_audience,
            created_at: training.created_at,
            updated_at: training.updated_at,
        })
    }
}

impl From<DomainNewTraining> for NewTraining {
    fn from(training: DomainNewTraining) -> Self {
        Self {
            name: training.name.into_inner(),
            description: training.description.into_inner(),
            short_description: training.short_description,
            category_id: training.category_id.get(),
            date: training.date,
            end_date: training.end_date,
            time_from: training.time_from,
            time_to: training.time_to,
            duration: training.duration,
            status: training.status.into(),
            available_slots: training.available_slots.get(),
            max_registrations: training.max_registrations.get(),
            registration_method: training.registration_method.into(),
            external_link: training.external_link.map(Into::into),
            hero_image: training.hero_image.map(Into::into),
            is_featured: training.is_featured,
            is_recommended: training.is_recommended,
            is_registration_open: training.is_registration_open,
            display_order: training.display_order,
            attachments: encode_attachments(training.attachments),
            location: training.location,
            speakers: training.speakers,
            target_audience: training.target_audience,
            created_at: training.created_at,
            updated_at: training.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachments_decode_from_json_array() {
        let urls = decode_attachments(r#"["https://files.example.com/a.pdf"]"#).unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].as_str(), "https://files.example.com/a.pdf");
        assert!(decode_attachments("").unwrap().is_empty());
        assert!(decode_attachments("not json").is_err());
    }

    #[test]
    fn attachments_encode_as_json_array() {
        let urls = vec![FileUrl::new("https://files.example.com/b.png").unwrap()];
        assert_eq!(
            encode_attachments(urls),
            r#"["https://files.example.com/b.png"]"#
        );
        assert_eq!(encode_attachments(Vec::new()), "[]");
    }
}
