use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::resource::{NewResource, Resource};
use crate::domain::types::ResourceId;
use crate::models::resource::{NewResource as DbNewResource, Resource as DbResource};
use crate::repository::{DieselRepository, ResourceReader, ResourceWriter};

impl ResourceReader for DieselRepository {
    fn list_resources(&self) -> RepositoryResult<Vec<Resource>> {
        use crate::schema::resources;

        let mut conn = self.conn()?;

        let items = resources::table
            .order(resources::title.asc())
            .load::<DbResource>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Resource>, _>>()?;

        Ok(items)
    }

    fn get_resource_by_id(&self, id: ResourceId) -> RepositoryResult<Option<Resource>> {
        use crate::schema::resources;

        let mut conn = self.conn()?;

        let resource = resources::table
            .filter(resources::id.eq(id.get()))
            .first::<DbResource>(&mut conn)
            .optional()?;

        Ok(resource.map(TryInto::try_into).transpose()?)
    }
}

impl ResourceWriter for DieselRepository {
    fn create_resource(&self, resource: &NewResource) -> RepositoryResult<Resource> {
        use crate::schema::resources;

        let mut conn = self.conn()?;
        let db_resource: DbNewResource = resource.clone().into();

        let created = diesel::insert_into(resources::table)
            .values(db_resource)
            .get_result::<DbResource>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_resource(&self, id: ResourceId, resource: &NewResource) -> RepositoryResult<usize> {
        use crate::schema::resources;

        let mut conn = self.conn()?;
        let db_resource: DbNewResource = resource.clone().into();

        let affected = diesel::update(resources::table.filter(resources::id.eq(id.get())))
            .set(db_resource)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_resource(&self, id: ResourceId) -> RepositoryResult<usize> {
        use crate::schema::resources;

        let mut conn = self.conn()?;

        let affected = diesel::delete(resources::table.filter(resources::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
