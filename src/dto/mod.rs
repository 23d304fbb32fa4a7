//! Serializable view models handed to templates and the JSON API.

use serde::Serialize;

pub mod categories;
pub mod pages;
pub mod registrations;
pub mod resources;
pub mod trainings;
pub mod updates;

/// `<option>` entry for status and action selects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDto {
    pub value: &'static str,
    pub label: &'static str,
    /// The UI asks for confirmation and a reason before submitting.
    pub requires_confirmation: bool,
}
