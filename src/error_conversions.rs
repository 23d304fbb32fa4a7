//! Error conversion glue between the domain, form and service layers.
//!
//! The domain layer must not depend on service or repository error types, so
//! the `From` impls live here.

use pushkind_common::repository::errors::RepositoryError;
use pushkind_common::services::errors::ServiceError;

use crate::domain::lifecycle::LifecycleError;
use crate::domain::types::TypeConstraintError;
use crate::forms::categories::CategoryFormError;
use crate::forms::pages::PageFormError;
use crate::forms::registrations::RegistrationFormError;
use crate::forms::resources::ResourceFormError;
use crate::forms::trainings::TrainingFormError;
use crate::services::bulk::BulkError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<LifecycleError> for ServiceError {
    fn from(val: LifecycleError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<BulkError> for ServiceError {
    fn from(val: BulkError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<CategoryFormError> for ServiceError {
    fn from(val: CategoryFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<TrainingFormError> for ServiceError {
    fn from(val: TrainingFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<RegistrationFormError> for ServiceError {
    fn from(val: RegistrationFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ResourceFormError> for ServiceError {
    fn from(val: ResourceFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<PageFormError> for ServiceError {
    fn from(val: PageFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
