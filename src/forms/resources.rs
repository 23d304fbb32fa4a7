use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::resource::NewResource;
use crate::domain::types::{
    ExternalLink, FileUrl, ResourceId, ResourceKind, ResourceTitle, TypeConstraintError,
};
use crate::forms::optional_text;

#[derive(Debug, Error)]
pub enum ResourceFormError {
    #[error("Resource form validation failed: {0}")]
    Validation(String),
    #[error("Resource form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("A resource needs a file or an external link")]
    MissingTarget,
}

impl From<ValidationErrors> for ResourceFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ResourceFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Deserialize, Validate)]
pub struct ResourceForm {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub kind: String,
    pub file_url: Option<String>,
    pub file_path: Option<String>,
    pub external_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFormPayload {
    pub resource: NewResource,
}

impl TryFrom<ResourceForm> for ResourceFormPayload {
    type Error = ResourceFormError;

    fn try_from(value: ResourceForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let file_url = optional_text(value.file_url).map(FileUrl::new).transpose()?;
        let external_link = optional_text(value.external_link)
            .map(ExternalLink::new)
            .transpose()?;
        if file_url.is_none() && external_link.is_none() {
            return Err(ResourceFormError::MissingTarget);
        }

        Ok(Self {
            resource: NewResource {
                title: ResourceTitle::new(value.title)?,
                kind: ResourceKind::try_from(value.kind)?,
                file_url,
                file_path: optional_text(value.file_path),
                external_link,
            },
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteResourceForm {
    #[validate(range(min = 1))]
    pub resource_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteResourceFormPayload {
    pub resource_id: ResourceId,
}

impl TryFrom<DeleteResourceForm> for DeleteResourceFormPayload {
    type Error = ResourceFormError;

    fn try_from(value: DeleteResourceForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            resource_id: ResourceId::new(value.resource_id)?,
        })
    }
}
