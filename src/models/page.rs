use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::page::{PageContent as DomainPageContent, PageVersion as DomainPageVersion};
use crate::domain::types::{PageSlug, TypeConstraintError};

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = crate::schema::page_contents)]
pub struct PageContent {
    pub slug: String,
    pub content: String,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::page_versions)]
pub struct PageVersion {
    pub id: i32,
    pub slug: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::page_versions)]
pub struct NewPageVersion {
    pub slug: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

fn parse_content(content: &str) -> Result<serde_json::Value, TypeConstraintError> {
    serde_json::from_str(content)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("page content: {e}")))
}

impl TryFrom<PageContent> for DomainPageContent {
    type Error = TypeConstraintError;

    fn try_from(page: PageContent) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: PageSlug::new(page.slug)?,
            content: parse_content(&page.content)?,
            updated_at: page.updated_at,
        })
    }
}

impl TryFrom<PageVersion> for DomainPageVersion {
    type Error = TypeConstraintError;

    fn try_from(version: PageVersion) -> Result<Self, Self::Error> {
        Ok(Self {
            id: version.id.try_into()?,
            slug: PageSlug::new(version.slug)?,
            content: parse_content(&version.content)?,
            created_at: version.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::page_contents)]
pub struct NewPageContent {
    pub slug: String,
    pub content: String,
    pub updated_at: NaiveDateTime,
}

impl From<DomainPageContent> for NewPageContent {
    fn from(page: DomainPageContent) -> Self {
        Self {
            slug: page.slug.into_inner(),
            content: page.content.to_string(),
            updated_at: page.updated_at,
        }
    }
}
