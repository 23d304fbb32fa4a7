use serde::Serialize;

use crate::domain::page::{PageContent, PageVersion};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageDto {
    pub slug: String,
    /// Block tree as posted by the editor.
    pub content: serde_json::Value,
    pub updated_at: Option<String>,
}

impl From<&PageContent> for PageDto {
    fn from(value: &PageContent) -> Self {
        Self {
            slug: value.slug.to_string(),
            content: value.content.clone(),
            updated_at: Some(value.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageVersionDto {
    pub id: i32,
    pub created_at: String,
}

impl From<&PageVersion> for PageVersionDto {
    fn from(value: &PageVersion) -> Self {
        Self {
            id: value.id.get(),
            created_at: value.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}
