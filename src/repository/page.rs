use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::page::{PageContent, PageVersion};
use crate::domain::types::{PageSlug, PageVersionId};
use crate::models::page::{
    NewPageContent, NewPageVersion, PageContent as DbPageContent, PageVersion as DbPageVersion,
};
use crate::repository::{DieselRepository, PageReader, PageWriter};

impl PageReader for DieselRepository {
    fn get_page(&self, slug: &PageSlug) -> RepositoryResult<Option<PageContent>> {
        use crate::schema::page_contents;

        let mut conn = self.conn()?;

        let page = page_contents::table
            .filter(page_contents::slug.eq(slug.as_str()))
            .first::<DbPageContent>(&mut conn)
            .optional()?;

        Ok(page.map(TryInto::try_into).transpose()?)
    }

    fn list_page_versions(&self, slug: &PageSlug) -> RepositoryResult<Vec<PageVersion>> {
        use crate::schema::page_versions;

        let mut conn = self.conn()?;

        let items = page_versions::table
            .filter(page_versions::slug.eq(slug.as_str()))
            .order((page_versions::created_at.desc(), page_versions::id.desc()))
            .load::<DbPageVersion>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<PageVersion>, _>>()?;

        Ok(items)
    }

    fn get_page_version(&self, id: PageVersionId) -> RepositoryResult<Option<PageVersion>> {
        use crate::schema::page_versions;

        let mut conn = self.conn()?;

        let version = page_versions::table
            .filter(page_versions::id.eq(id.get()))
            .first::<DbPageVersion>(&mut conn)
            .optional()?;

        Ok(version.map(TryInto::try_into).transpose()?)
    }
}

impl PageWriter for DieselRepository {
    fn save_page(&self, page: &PageContent) -> RepositoryResult<usize> {
        use crate::schema::{page_contents, page_versions};

        let mut conn = self.conn()?;
        let new_page: NewPageContent = page.clone().into();

        let affected = conn.transaction(|conn| {
            let previous = page_contents::table
                .filter(page_contents::slug.eq(&new_page.slug))
                .first::<DbPageContent>(conn)
                .optional()?;

            if let Some(previous) = previous {
                diesel::insert_into(page_versions::table)
                    .values(NewPageVersion {
                        slug: previous.slug,
                        content: previous.content,
                        created_at: new_page.updated_at,
                    })
                    .execute(conn)?;
            }

            diesel::insert_into(page_contents::table)
                .values(&new_page)
                .on_conflict(page_contents::slug)
                .do_update()
                .set((
                    page_contents::content.eq(&new_page.content),
                    page_contents::updated_at.eq(new_page.updated_at),
                ))
                .execute(conn)
        })?;

        Ok(affected)
    }
}
