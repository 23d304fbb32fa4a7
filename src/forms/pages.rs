use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{PageVersionId, TypeConstraintError};

#[derive(Debug, Error)]
pub enum PageFormError {
    #[error("Page form validation failed: {0}")]
    Validation(String),
    #[error("Page form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Page content is not valid JSON: {0}")]
    InvalidContent(String),
}

impl From<ValidationErrors> for PageFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for PageFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

/// Serialized block tree posted by the page editor.
#[derive(Deserialize, Validate)]
pub struct SavePageForm {
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavePageFormPayload {
    pub content: serde_json::Value,
}

impl TryFrom<SavePageForm> for SavePageFormPayload {
    type Error = PageFormError;

    fn try_from(value: SavePageForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let content = serde_json::from_str(&value.content)
            .map_err(|e| PageFormError::InvalidContent(e.to_string()))?;
        Ok(Self { content })
    }
}

#[derive(Deserialize, Validate)]
pub struct RestorePageVersionForm {
    #[validate(range(min = 1))]
    pub version_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestorePageVersionFormPayload {
    pub version_id: PageVersionId,
}

impl TryFrom<RestorePageVersionForm> for RestorePageVersionFormPayload {
    type Error = PageFormError;

    fn try_from(value: RestorePageVersionForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            version_id: PageVersionId::new(value.version_id)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_block_tree() {
        let form = SavePageForm {
            content: r#"{"blocks":[{"type":"heading","text":"Support"}]}"#.into(),
        };

        let payload: SavePageFormPayload = form.try_into().unwrap();
        assert_eq!(payload.content["blocks"][0]["type"], "heading");
    }

    #[test]
    fn rejects_malformed_json() {
        let form = SavePageForm {
            content: "{blocks:".into(),
        };

        let payload: Result<SavePageFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(PageFormError::InvalidContent(_))));
    }
}
