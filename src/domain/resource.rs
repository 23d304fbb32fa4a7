use serde::{Deserialize, Serialize};

use crate::domain::types::{ExternalLink, FileUrl, ResourceId, ResourceKind, ResourceTitle};

/// Static reference material shown alongside trainings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub title: ResourceTitle,
    pub kind: ResourceKind,
    pub file_url: Option<FileUrl>,
    /// Path of the object inside the file storage bucket.
    pub file_path: Option<String>,
    pub external_link: Option<ExternalLink>,
}

/// Data required to insert a new [`Resource`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewResource {
    pub title: ResourceTitle,
    pub kind: ResourceKind,
    pub file_url: Option<FileUrl>,
    pub file_path: Option<String>,
    pub external_link: Option<ExternalLink>,
}
