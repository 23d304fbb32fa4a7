use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::training_update::{NewTrainingUpdate, TrainingUpdate};
use crate::models::training_update::{
    NewTrainingUpdate as DbNewTrainingUpdate, TrainingUpdate as DbTrainingUpdate,
};
use crate::repository::{DieselRepository, TrainingUpdateReader, TrainingUpdateWriter};

impl TrainingUpdateReader for DieselRepository {
    fn list_training_updates(&self, limit: usize) -> RepositoryResult<Vec<TrainingUpdate>> {
        use crate::schema::training_updates;

        let mut conn = self.conn()?;

        let items = training_updates::table
            .order((training_updates::timestamp.desc(), training_updates::id.desc()))
            .limit(limit as i64)
            .load::<DbTrainingUpdate>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<TrainingUpdate>, _>>()?;

        Ok(items)
    }
}

impl TrainingUpdateWriter for DieselRepository {
    fn create_training_update(
        &self,
        update: &NewTrainingUpdate,
    ) -> RepositoryResult<TrainingUpdate> {
        use crate::schema::training_updates;

        let mut conn = self.conn()?;
        let db_update: DbNewTrainingUpdate = update.clone().into();

        let created = diesel::insert_into(training_updates::table)
            .values(db_update)
            .get_result::<DbTrainingUpdate>(&mut conn)?;

        Ok(created.try_into()?)
    }
}
