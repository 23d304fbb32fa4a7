use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::training_update::ACTIVITY_FEED_LIMIT;
use crate::dto::updates::TrainingUpdateDto;
use crate::repository::TrainingUpdateReader;

use super::{ServiceError, ServiceResult, ensure_admin};

/// Latest activity feed entries, newest first.
pub fn show_updates<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<TrainingUpdateDto>>
where
    R: TrainingUpdateReader,
{
    ensure_admin(user)?;

    match repo.list_training_updates(ACTIVITY_FEED_LIMIT) {
        Ok(updates) => Ok(updates.iter().map(TrainingUpdateDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list training updates: {e}");
            Err(ServiceError::Internal)
        }
    }
}
