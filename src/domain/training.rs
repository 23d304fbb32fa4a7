use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::capacity::{Capacity, registration_open_after_save};
use crate::domain::types::{
    CategoryId, ExternalLink, FileUrl, RegistrationMethod, SlotCount, TrainingDescription,
    TrainingId, TrainingName, TrainingStatus,
};

/// A scheduled training session participants can enroll in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Training {
    pub id: TrainingId,
    pub name: TrainingName,
    pub description: TrainingDescription,
    pub short_description: Option<String>,
    /// May reference a deleted category; no cascade is applied.
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Training {
    pub fn capacity(&self) -> Capacity {
        Capacity::new(self.max_registrations, self.available_slots)
    }

    /// Whether a participant may sign up through the internal form right now.
    pub fn accepts_self_registration(&self) -> bool {
        self.registration_method == RegistrationMethod::Internal
            && self.is_registration_open
            && self.available_slots.get() > 0
    }
}

/// Data required to insert or overwrite a [`Training`].
///
/// Edits replace the whole record, so the same struct serves both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTraining {
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
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewTraining {
    /// Applies the save-time auto-close rule: a training without free slots
    /// never stays open for registration.
    pub fn close_registration_if_full(mut self) -> Self {
        self.is_registration_open =
            registration_open_after_save(self.available_slots, self.is_registration_open);
        self
    }

    /// Materializes the record once the store has assigned an id.
    pub fn with_id(self, id: TrainingId) -> Training {
        Training {
            id,
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
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
