use diesel::prelude::*;

use crate::domain::resource::{NewResource as DomainNewResource, Resource as DomainResource};
use crate::domain::types::{
    ExternalLink, FileUrl, ResourceKind, ResourceTitle, TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::resources)]
pub struct Resource {
    pub id: i32,
    pub title: String,
    pub kind: String,
    pub file_url: Option<String>,
    pub file_path: Option<String>,
    pub external_link: Option<String>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::resources, treat_none_as_null = true)]
pub struct NewResource {
    pub title: String,
    pub kind: String,
    pub file_url: Option<String>,
    pub file_path: Option<String>,
    pub external_link: Option<String>,
}

impl TryFrom<Resource> for DomainResource {
    type Error = TypeConstraintError;

    fn try_from(resource: Resource) -> Result<Self, Self::Error> {
        Ok(Self {
            id: resource.id.try_into()?,
            title: ResourceTitle::new(resource.title)?,
            kind: ResourceKind::try_from(resource.kind)?,
            file_url: resource.file_url.map(FileUrl::new).transpose()?,
            file_path: resource.file_path,
            external_link: resource.external_link.map(ExternalLink::new).transpose()?,
        })
    }
}

impl From<DomainNewResource> for NewResource {
    fn from(resource: DomainNewResource) -> Self {
        Self {
            title: resource.title.into_inner(),
            kind: resource.kind.into(),
            file_url: resource.file_url.map(Into::into),
            file_path: resource.file_path,
            external_link: resource.external_link.map(Into::into),
        }
    }
}
