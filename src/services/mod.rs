//! Business logic behind the HTTP routes.
//!
//! Service functions check roles, talk to repositories through traits and
//! translate failures into [`ServiceError`] so routes stay thin.

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::ADMIN_ROLE;
use crate::repository::{CategoryReader, RegistrationReader, TrainingReader, TrainingUpdateReader};
use crate::services::state::TrainingState;

pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod api;
pub mod bulk;
pub mod categories;
pub mod export;
pub mod main;
pub mod pages;
pub mod projection;
pub mod registrations;
pub mod resources;
pub mod state;
pub mod trainings;
pub mod updates;

pub(crate) fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(ADMIN_ROLE, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub(crate) fn is_admin(user: &AuthenticatedUser) -> bool {
    check_role(ADMIN_ROLE, &user.roles)
}

pub(crate) fn load_state<R>(repo: &R) -> ServiceResult<TrainingState>
where
    R: CategoryReader + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    TrainingState::load(repo).map_err(|e| {
        log::error!("Failed to load training state: {e}");
        ServiceError::Internal
    })
}
