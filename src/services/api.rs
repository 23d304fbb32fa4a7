use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::domain::types::{CategoryId, TrainingId};
use crate::dto::trainings::{CapacityDto, TrainingDto};
use crate::repository::{CategoryReader, TrainingReader};

use super::{ServiceError, ServiceResult};

/// Query parameters accepted by the `api_v1_trainings` endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct ApiV1TrainingsQueryParams {
    pub category_id: Option<i32>,
    /// Only trainings that accept self-registration right now.
    #[serde(default)]
    pub open: bool,
}

/// Core business logic for the `/api/v1/trainings` endpoint.
pub fn api_v1_trainings<R>(
    params: ApiV1TrainingsQueryParams,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<TrainingDto>>
where
    R: CategoryReader + TrainingReader,
{
    let category_id = match params.category_id.map(CategoryId::new).transpose() {
        Ok(category_id) => category_id,
        Err(_) => return Err(ServiceError::NotFound),
    };

    let (trainings, categories) = match (repo.list_trainings(), repo.list_categories()) {
        (Ok(trainings), Ok(categories)) => (trainings, categories),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to load trainings for api: {e}");
            return Err(ServiceError::Internal);
        }
    };

    Ok(trainings
        .iter()
        .filter(|t| category_id.is_none_or(|id| t.category_id == id))
        .filter(|t| !params.open || t.accepts_self_registration())
        .map(|t| TrainingDto::new(t, &categories))
        .collect())
}

/// Core business logic for the `/api/v1/trainings/{id}/capacity` endpoint.
pub fn api_v1_training_capacity<R>(
    training_id: i32,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<CapacityDto>
where
    R: TrainingReader,
{
    let training_id = TrainingId::new(training_id).map_err(|_| ServiceError::NotFound)?;

    match repo.get_training_by_id(training_id) {
        Ok(Some(training)) => Ok(CapacityDto::from(&training)),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get training {training_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
