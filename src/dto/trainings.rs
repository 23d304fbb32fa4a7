use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::training::Training;
use crate::dto::categories::CategoryDto;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityDto {
    pub training_id: i32,
    pub max_registrations: i32,
    pub available_slots: i32,
    pub enrolled: i32,
    pub fill_rate: i32,
    pub is_full: bool,
    pub is_registration_open: bool,
}

impl From<&Training> for CapacityDto {
    fn from(value: &Training) -> Self {
        let capacity = value.capacity();
        Self {
            training_id: value.id.get(),
            max_registrations: capacity.max_registrations,
            available_slots: capacity.available_slots,
            enrolled: capacity.enrolled(),
            fill_rate: capacity.fill_rate(),
            is_full: capacity.is_full(),
            is_registration_open: value.is_registration_open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category_id: i32,
    /// `None` when the category was deleted.
    pub category: Option<CategoryDto>,
    pub date: String,
    pub end_date: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub duration: Option<String>,
    pub status: &'static str,
    pub registration_method: &'static str,
    pub registration_method_label: &'static str,
    pub external_link: Option<String>,
    pub hero_image: Option<String>,
    pub is_featured: bool,
    pub is_recommended: bool,
    pub is_registration_open: bool,
    pub accepts_self_registration: bool,
    pub display_order: Option<i32>,
    pub attachments: Vec<String>,
    pub location: Option<String>,
    pub speakers: Option<String>,
    pub target_audience: Option<String>,
    pub capacity: CapacityDto,
}

impl TrainingDto {
    pub fn new(training: &Training, categories: &[Category]) -> Self {
        let category = categories
            .iter()
            .find(|c| c.id == training.category_id)
            .map(CategoryDto::from);

        Self {
            id: training.id.get(),
            name: training.name.to_string(),
            description: training.description.to_string(),
            short_description: training.short_description.clone(),
            category_id: training.category_id.get(),
            category,
            date: training.date.format("%Y-%m-%d").to_string(),
            end_date: training.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            time_from: training.time_from.map(|t| t.format("%H:%M").to_string()),
            time_to: training.time_to.map(|t| t.format("%H:%M").to_string()),
            duration: training.duration.clone(),
            status: training.status.label(),
            registration_method: training.registration_method.as_str(),
            registration_method_label: training.registration_method.label(),
            external_link: training.external_link.as_ref().map(ToString::to_string),
            hero_image: training.hero_image.as_ref().map(ToString::to_string),
            is_featured: training.is_featured,
            is_recommended: training.is_recommended,
            is_registration_open: training.is_registration_open,
            accepts_self_registration: training.accepts_self_registration(),
            display_order: training.display_order,
            attachments: training.attachments.iter().map(ToString::to_string).collect(),
            location: training.location.clone(),
            speakers: training.speakers.clone(),
            target_audience: training.target_audience.clone(),
            capacity: CapacityDto::from(training),
        }
    }
}
