use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::registration::{NewRegistration, Registration};
use crate::domain::types::RegistrationId;
use crate::models::registration::{
    NewRegistration as DbNewRegistration, Registration as DbRegistration, RegistrationChangeset,
};
use crate::repository::{DieselRepository, RegistrationReader, RegistrationWriter};

impl RegistrationReader for DieselRepository {
    fn list_registrations(&self) -> RepositoryResult<Vec<Registration>> {
        use crate::schema::registrations;

        let mut conn = self.conn()?;

        let items = registrations::table
            .order((registrations::registered_at.desc(), registrations::id.desc()))
            .load::<DbRegistration>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Registration>, _>>()?;

        Ok(items)
    }

    fn get_registration_by_id(
        &self,
        id: RegistrationId,
    ) -> RepositoryResult<Option<Registration>> {
        use crate::schema::registrations;

        let mut conn = self.conn()?;

        let registration = registrations::table
            .filter(registrations::id.eq(id.get()))
            .first::<DbRegistration>(&mut conn)
            .optional()?;

        let registration = registration.map(TryInto::try_into).transpose()?;
        Ok(registration)
    }
}

impl RegistrationWriter for DieselRepository {
    fn create_registration(
        &self,
        registration: &NewRegistration,
    ) -> RepositoryResult<Registration> {
        use crate::schema::{registrations, trainings};

        let mut conn = self.conn()?;
        let db_registration: DbNewRegistration = registration.clone().into();
        let training_id = registration.training_id.get();

        let created = conn.transaction(|conn| {
            let created = diesel::insert_into(registrations::table)
                .values(db_registration)
                .get_result::<DbRegistration>(conn)?;

            diesel::update(
                trainings::table
                    .filter(trainings::id.eq(training_id))
                    .filter(trainings::available_slots.gt(0)),
            )
            .set(trainings::available_slots.eq(trainings::available_slots - 1))
            .execute(conn)?;

            Ok::<_, diesel::result::Error>(created)
        })?;

        Ok(created.try_into()?)
    }

    fn update_registration(&self, registration: &Registration) -> RepositoryResult<usize> {
        use crate::schema::registrations;

        let mut conn = self.conn()?;
        let changes = RegistrationChangeset::from(registration);

        let affected =
            diesel::update(registrations::table.filter(registrations::id.eq(registration.id.get())))
                .set(changes)
                .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_registration(&self, id: RegistrationId) -> RepositoryResult<usize> {
        use crate::schema::registrations;

        let mut conn = self.conn()?;

        let affected = diesel::delete(registrations::table.filter(registrations::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
