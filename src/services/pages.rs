//! Support page built with the block editor, with restorable history.

use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::page::{PageContent, SUPPORT_PAGE_SLUG};
use crate::domain::types::PageSlug;
use crate::dto::pages::{PageDto, PageVersionDto};
use crate::forms::pages::{RestorePageVersionFormPayload, SavePageFormPayload};
use crate::repository::{PageReader, PageWriter};

use super::{ServiceError, ServiceResult, ensure_admin};

fn support_slug() -> ServiceResult<PageSlug> {
    PageSlug::new(SUPPORT_PAGE_SLUG).map_err(|e| {
        log::error!("Invalid support page slug: {e}");
        ServiceError::Internal
    })
}

/// The support page, or an empty block list before the first save.
pub fn show_page<R>(_user: &AuthenticatedUser, repo: &R) -> ServiceResult<PageDto>
where
    R: PageReader,
{
    let slug = support_slug()?;
    match repo.get_page(&slug) {
        Ok(Some(page)) => Ok(PageDto::from(&page)),
        Ok(None) => Ok(PageDto {
            slug: slug.into_inner(),
            content: serde_json::Value::Array(vec![]),
            updated_at: None,
        }),
        Err(e) => {
            log::error!("Failed to load support page: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Store new content. The previous content becomes a version.
pub fn save_page<R>(
    payload: SavePageFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: PageWriter,
{
    ensure_admin(user)?;

    let page = PageContent {
        slug: support_slug()?,
        content: payload.content,
        updated_at: now,
    };
    match repo.save_page(&page) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to save support page: {e}");
            Ok(false)
        }
    }
}

pub fn list_page_versions<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<PageVersionDto>>
where
    R: PageReader,
{
    ensure_admin(user)?;

    let slug = support_slug()?;
    match repo.list_page_versions(&slug) {
        Ok(versions) => Ok(versions.iter().map(PageVersionDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list page versions: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Make an old version live again. The content being replaced is itself
/// kept as a version, so a restore can be undone.
pub fn restore_page_version<R>(
    payload: RestorePageVersionFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: PageReader + PageWriter,
{
    ensure_admin(user)?;

    let version = match repo.get_page_version(payload.version_id) {
        Ok(Some(version)) => version,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get page version {}: {e}", payload.version_id);
            return Err(ServiceError::Internal);
        }
    };

    let page = PageContent {
        slug: version.slug,
        content: version.content,
        updated_at: now,
    };
    match repo.save_page(&page) {
        Ok(_) => Ok(true),
        Err(e) => {
            log::error!("Failed to restore page version {}: {e}", payload.version_id);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PageVersionId;
    use crate::repository::test::TestRepository;
    use crate::repository::test::fixtures::{admin, at, member};
    use serde_json::json;

    fn save(repo: &TestRepository, content: serde_json::Value, minute: u32) {
        assert!(save_page(SavePageFormPayload { content }, &admin(), repo, at(6, 9, minute)).unwrap());
    }

    #[test]
    fn empty_page_before_first_save() {
        let page = show_page(&member(), &TestRepository::new()).unwrap();
        assert_eq!(page.slug, "support");
        assert_eq!(page.content, json!([]));
        assert_eq!(page.updated_at, None);
    }

    #[test]
    fn saving_snapshots_previous_content() {
        let repo = TestRepository::new();
        save(&repo, json!([{"type": "heading", "text": "v1"}]), 0);
        assert!(repo.stored_versions().is_empty());

        save(&repo, json!([{"type": "heading", "text": "v2"}]), 5);

        let versions = repo.stored_versions();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].content[0]["text"], "v1");
        let page = show_page(&member(), &repo).unwrap();
        assert_eq!(page.content[0]["text"], "v2");
    }

    #[test]
    fn restore_brings_back_old_content() {
        let repo = TestRepository::new();
        save(&repo, json!(["v1"]), 0);
        save(&repo, json!(["v2"]), 5);
        let version_id = list_page_versions(&admin(), &repo).unwrap()[0].id;

        let payload = RestorePageVersionFormPayload {
            version_id: PageVersionId::new(version_id).unwrap(),
        };
        assert!(restore_page_version(payload, &admin(), &repo, at(6, 10, 0)).unwrap());

        assert_eq!(show_page(&member(), &repo).unwrap().content, json!(["v1"]));
        assert_eq!(repo.stored_versions().len(), 2);
    }

    #[test]
    fn members_cannot_edit_page() {
        let repo = TestRepository::new();
        assert!(matches!(
            save_page(SavePageFormPayload { content: json!([]) }, &member(), &repo, at(6, 9, 0)),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            list_page_versions(&member(), &repo),
            Err(ServiceError::Unauthorized)
        ));
    }
}
