use serde::Serialize;

use crate::domain::training_update::TrainingUpdate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingUpdateDto {
    pub id: i32,
    pub kind: &'static str,
    pub training_id: Option<i32>,
    pub training_name: String,
    pub message: String,
    pub timestamp: String,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

impl From<&TrainingUpdate> for TrainingUpdateDto {
    fn from(value: &TrainingUpdate) -> Self {
        Self {
            id: value.id.get(),
            kind: value.kind.as_str(),
            training_id: value.training_id.map(|id| id.get()),
            training_name: value.training_name.to_string(),
            message: value.message.clone(),
            timestamp: value.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            previous_value: value.previous_value.clone(),
            new_value: value.new_value.clone(),
        }
    }
}
