use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::training::{NewTraining, Training};
use crate::domain::types::TrainingId;
use crate::models::training::{NewTraining as DbNewTraining, Training as DbTraining};
use crate::repository::{DieselRepository, TrainingReader, TrainingWriter};

impl TrainingReader for DieselRepository {
    fn list_trainings(&self) -> RepositoryResult<Vec<Training>> {
        use crate::schema::trainings;

        let mut conn = self.conn()?;

        let items = trainings::table
            .order((
                trainings::date.asc(),
                trainings::display_order.asc(),
                trainings::id.asc(),
            ))
            .load::<DbTraining>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Training>, _>>()?;

        Ok(items)
    }

    fn get_training_by_id(&self, id: TrainingId) -> RepositoryResult<Option<Training>> {
        use crate::schema::trainings;

        let mut conn = self.conn()?;

        let training = trainings::table
            .filter(trainings::id.eq(id.get()))
            .first::<DbTraining>(&mut conn)
            .optional()?;

        let training = training.map(TryInto::try_into).transpose()?;
        Ok(training)
    }
}

impl TrainingWriter for DieselRepository {
    fn create_training(&self, training: &NewTraining) -> RepositoryResult<Training> {
        use crate::schema::trainings;

        let mut conn = self.conn()?;
        let db_training: DbNewTraining = training.clone().into();

        let created = diesel::insert_into(trainings::table)
            .values(db_training)
            .get_result::<DbTraining>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_training(&self, id: TrainingId, training: &NewTraining) -> RepositoryResult<usize> {
        use crate::schema::trainings;

        let mut conn = self.conn()?;
        let db_training: DbNewTraining = training.clone().into();

        let affected = diesel::update(trainings::table.filter(trainings::id.eq(id.get())))
            .set(db_training)
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_training(&self, id: TrainingId) -> RepositoryResult<usize> {
        use crate::schema::trainings;

        let mut conn = self.conn()?;

        let affected = diesel::delete(trainings::table.filter(trainings::id.eq(id.get())))
            .execute(&mut conn)?;

        Ok(affected)
    }
}
