use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{TrainingId, TrainingName, TrainingUpdateId, TrainingUpdateKind};

/// Number of activity entries kept in memory and shown on the feed.
pub const ACTIVITY_FEED_LIMIT: usize = 50;

/// Append-only activity feed entry describing an admin change to a training.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingUpdate {
    pub id: TrainingUpdateId,
    pub kind: TrainingUpdateKind,
    /// Missing once the training itself has been deleted.
    pub training_id: Option<TrainingId>,
    pub training_name: TrainingName,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}

/// Data required to append a [`TrainingUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTrainingUpdate {
    pub kind: TrainingUpdateKind,
    pub training_id: Option<TrainingId>,
    pub training_name: TrainingName,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub previous_value: Option<String>,
    pub new_value: Option<String>,
}
