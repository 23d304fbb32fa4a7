use pushkind_common::domain::auth::AuthenticatedUser;

use crate::dto::categories::CategoryDto;
use crate::forms::categories::{
    AddCategoryFormPayload, DeleteCategoryFormPayload, UpdateCategoryFormPayload,
};
use crate::repository::{
    CategoryReader, CategoryWriter, RegistrationReader, TrainingReader, TrainingUpdateReader,
};
use crate::services::state::StateError;

use super::{ServiceError, ServiceResult, ensure_admin, load_state};

pub fn show_categories<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    ensure_admin(user)?;

    match repo.list_categories() {
        Ok(categories) => Ok(categories.iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn add_category<R>(
    payload: AddCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    match state.create_category(repo, &payload.category) {
        Ok(category) => {
            log::info!("Created category {} ({})", category.id, category.name);
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            Ok(false)
        }
    }
}

pub fn update_category<R>(
    payload: UpdateCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    match state.update_category(repo, payload.category) {
        Ok(()) => Ok(true),
        Err(StateError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update category: {e}");
            Ok(false)
        }
    }
}

pub fn delete_category<R>(
    payload: DeleteCategoryFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryReader + CategoryWriter + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    match state.delete_category(repo, payload.category_id) {
        Ok(()) => Ok(true),
        Err(StateError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Ok(false)
        }
    }
}
