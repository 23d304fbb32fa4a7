use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{PageSlug, PageVersionId};

/// Slug of the only page managed by the page builder.
pub const SUPPORT_PAGE_SLUG: &str = "support";

/// Live content of a CMS page. `content` is the serialized block tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageContent {
    pub slug: PageSlug,
    pub content: serde_json::Value,
    pub updated_at: NaiveDateTime,
}

/// Snapshot of page content taken before each save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageVersion {
    pub id: PageVersionId,
    pub slug: PageSlug,
    pub content: serde_json::Value,
    pub created_at: NaiveDateTime,
}
