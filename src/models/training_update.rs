use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::training_update::{
    NewTrainingUpdate as DomainNewTrainingUpdate, TrainingUpdate as DomainTrainingUpdate,
};
use crate::domain::types::{TrainingName, TrainingUpdateKind, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::training_updates)]
pub struct TrainingUpdate {
    pub id: i32,
    pub kind: String,
    pub training_id: Option<i32>,
    pub training_name: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::training_updates)]
pub struct NewTrainingUpdate {
    pub kind: String,
    pub training_id: Option<i32>,
    pub training_name: String,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

impl TryFrom<TrainingUpdate> for DomainTrainingUpdate {
    type Error = TypeConstraintError;

    fn try_from(update: TrainingUpdate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: update.id.try_into()?,
            kind: TrainingUpdateKind::try_from(update.kind)?,
            training_id: update.training_id.map(TryInto::try_into).transpose()?,
            training_name: TrainingName::new(update.training_name)?,
            message: update.message,
            timestamp: update.timestamp,
            previous_value: update.previous_value,
            new_value: update.new_value,
        })
    }
}

impl From<DomainNewTrainingUpdate> for NewTrainingUpdate {
    fn from(update: DomainNewTrainingUpdate) -> Self {
        Self {
            kind: update.kind.into(),
            training_id: update.training_id.map(|id| id.get()),
            training_name: update.training_name.into_inner(),
            message: update.message,
            timestamp: update.timestamp,
            previous_value: update.previous_value,
            new_value: update.new_value,
        }
    }
}
