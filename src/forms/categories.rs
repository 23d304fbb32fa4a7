use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{Category, NewCategory};
use crate::domain::types::{CategoryColor, CategoryId, CategoryName, TypeConstraintError};

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Deserialize, Validate)]
pub struct AddCategoryForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(equal = 7))]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub category: NewCategory,
}

impl TryFrom<AddCategoryForm> for AddCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: AddCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category: NewCategory {
                name: CategoryName::new(value.name)?,
                color: CategoryColor::new(value.color)?,
            },
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateCategoryForm {
    #[validate(range(min = 1))]
    pub category_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(equal = 7))]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryFormPayload {
    pub category: Category,
}

impl TryFrom<UpdateCategoryForm> for UpdateCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: UpdateCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category: Category {
                id: CategoryId::new(value.category_id)?,
                name: CategoryName::new(value.name)?,
                color: CategoryColor::new(value.color)?,
            },
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct DeleteCategoryForm {
    #[validate(range(min = 1))]
    pub category_id: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCategoryFormPayload {
    pub category_id: CategoryId,
}

impl TryFrom<DeleteCategoryForm> for DeleteCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: DeleteCategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            category_id: CategoryId::new(value.category_id)?,
        })
    }
}
