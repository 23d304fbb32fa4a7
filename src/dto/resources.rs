use serde::Serialize;

use crate::domain::resource::Resource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceDto {
    pub id: i32,
    pub title: String,
    pub kind: &'static str,
    pub kind_label: &'static str,
    pub file_url: Option<String>,
    pub file_path: Option<String>,
    pub external_link: Option<String>,
}

impl From<&Resource> for ResourceDto {
    fn from(value: &Resource) -> Self {
        Self {
            id: value.id.get(),
            title: value.title.to_string(),
            kind: value.kind.as_str(),
            kind_label: value.kind.label(),
            file_url: value.file_url.as_ref().map(ToString::to_string),
            file_path: value.file_path.clone(),
            external_link: value.external_link.as_ref().map(ToString::to_string),
        }
    }
}
