use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::types::ResourceId;
use crate::dto::resources::ResourceDto;
use crate::forms::resources::{DeleteResourceFormPayload, ResourceFormPayload};
use crate::repository::{ResourceReader, ResourceWriter};

use super::{ServiceError, ServiceResult, ensure_admin};

/// Reference material is visible to every signed-in user.
pub fn show_resources<R>(_user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<ResourceDto>>
where
    R: ResourceReader,
{
    match repo.list_resources() {
        Ok(resources) => Ok(resources.iter().map(ResourceDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list resources: {e}");
            Err(ServiceError::Internal)
        }
    }
}

pub fn add_resource<R>(
    payload: ResourceFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ResourceWriter,
{
    ensure_admin(user)?;

    match repo.create_resource(&payload.resource) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to create resource: {e}");
            Ok(false)
        }
    }
}

pub fn update_resource<R>(
    resource_id: ResourceId,
    payload: ResourceFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ResourceReader + ResourceWriter,
{
    ensure_admin(user)?;

    match repo.get_resource_by_id(resource_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get resource {resource_id}: {e}");
            return Err(ServiceError::Internal);
        }
    }

    match repo.update_resource(resource_id, &payload.resource) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to update resource {resource_id}: {e}");
            Ok(false)
        }
    }
}

pub fn delete_resource<R>(
    payload: DeleteResourceFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: ResourceReader + ResourceWriter,
{
    ensure_admin(user)?;

    match repo.get_resource_by_id(payload.resource_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get resource {}: {e}", payload.resource_id);
            return Err(ServiceError::Internal);
        }
    }

    match repo.delete_resource(payload.resource_id) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to delete resource {}: {e}", payload.resource_id);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::resource::{NewResource, Resource};
    use crate::domain::types::{ExternalLink, ResourceKind, ResourceTitle};
    use crate::repository::test::TestRepository;
    use crate::repository::test::fixtures::{admin, member};

    fn new_resource(title: &str) -> NewResource {
        NewResource {
            title: ResourceTitle::new(title).unwrap(),
            kind: ResourceKind::Link,
            file_url: None,
            file_path: None,
            external_link: Some(ExternalLink::new("https://example.com/guide").unwrap()),
        }
    }

    fn seeded() -> TestRepository {
        TestRepository::new().with_resources(vec![Resource {
            id: ResourceId::new(1).unwrap(),
            title: ResourceTitle::new("Handbook").unwrap(),
            kind: ResourceKind::Document,
            file_url: None,
            file_path: Some("docs/handbook.pdf".into()),
            external_link: None,
        }])
    }

    #[test]
    fn members_can_browse_but_not_edit() {
        let repo = seeded();
        let listed = show_resources(&member(), &repo).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].kind_label, "Document");

        let payload = ResourceFormPayload {
            resource: new_resource("Guide"),
        };
        assert!(matches!(
            add_resource(payload, &member(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn update_replaces_fields() {
        let repo = seeded();
        let payload = ResourceFormPayload {
            resource: new_resource("Guide"),
        };

        assert!(update_resource(ResourceId::new(1).unwrap(), payload, &admin(), &repo).unwrap());
        let stored = repo.get_resource_by_id(ResourceId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(stored.title.as_str(), "Guide");
        assert_eq!(stored.kind, ResourceKind::Link);
        assert_eq!(stored.file_path, None);
    }

    #[test]
    fn delete_unknown_resource_is_not_found() {
        let payload = DeleteResourceFormPayload {
            resource_id: ResourceId::new(9).unwrap(),
        };
        assert!(matches!(
            delete_resource(payload, &admin(), &seeded()),
            Err(ServiceError::NotFound)
        ));
    }
}
