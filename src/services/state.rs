//! Cached view of the training catalogue and its enrollments.
//!
//! A [`TrainingState`] is loaded from the repository for each request and
//! passed explicitly to the operations that need it. Every record operation
//! writes to the store first and only touches the cache once the write
//! succeeded.

use std::collections::HashSet;

use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};
use thiserror::Error;

use crate::domain::category::{Category, NewCategory};
use crate::domain::registration::{NewRegistration, Registration};
use crate::domain::training::{NewTraining, Training};
use crate::domain::training_update::{ACTIVITY_FEED_LIMIT, NewTrainingUpdate, TrainingUpdate};
use crate::domain::types::{CategoryId, RegistrationId, TrainingId};
use crate::repository::{
    CategoryReader, CategoryWriter, RegistrationReader, RegistrationWriter, TrainingReader,
    TrainingUpdateReader, TrainingUpdateWriter, TrainingWriter,
};

/// Failure of a single record operation.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("record not found")]
    NotFound,
    #[error("store operation failed: {0}")]
    Store(#[from] RepositoryError),
}

pub type StateResult<T> = Result<T, StateError>;

#[derive(Debug, Clone, Default)]
pub struct TrainingState {
    categories: Vec<Category>,
    trainings: Vec<Training>,
    registrations: Vec<Registration>,
    /// Newest first, never longer than [`ACTIVITY_FEED_LIMIT`].
    updates: Vec<TrainingUpdate>,
}

impl TrainingState {
    pub fn load<R>(repo: &R) -> RepositoryResult<Self>
    where
        R: CategoryReader + TrainingReader + RegistrationReader + TrainingUpdateReader,
    {
        Ok(Self {
            categories: repo.list_categories()?,
            trainings: repo.list_trainings()?,
            registrations: repo.list_registrations()?,
            updates: repo.list_training_updates(ACTIVITY_FEED_LIMIT)?,
        })
    }

    /// Replace the whole cache with the store's current contents.
    pub fn refresh<R>(&mut self, repo: &R) -> RepositoryResult<()>
    where
        R: CategoryReader + TrainingReader + RegistrationReader + TrainingUpdateReader,
    {
        *self = Self::load(repo)?;
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn trainings(&self) -> &[Training] {
        &self.trainings
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn updates(&self) -> &[TrainingUpdate] {
        &self.updates
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn training(&self, id: TrainingId) -> Option<&Training> {
        self.trainings.iter().find(|t| t.id == id)
    }

    pub fn registration(&self, id: RegistrationId) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.id == id)
    }

    pub fn registrations_for_training(
        &self,
        training_id: TrainingId,
    ) -> impl Iterator<Item = &Registration> {
        self.registrations
            .iter()
            .filter(move |r| r.training_id == training_id)
    }

    pub fn training_ids_for_category(&self, category_id: CategoryId) -> HashSet<TrainingId> {
        self.trainings
            .iter()
            .filter(|t| t.category_id == category_id)
            .map(|t| t.id)
            .collect()
    }

    /// Insert a registration and re-read its training so the cached slot
    /// count reflects the store's decrement.
    pub fn create_registration<R>(
        &mut self,
        repo: &R,
        registration: &NewRegistration,
    ) -> StateResult<Registration>
    where
        R: RegistrationWriter + TrainingReader,
    {
        let created = repo.create_registration(registration)?;
        self.registrations.insert(0, created.clone());

        match repo.get_training_by_id(created.training_id) {
            Ok(Some(training)) => self.replace_training(training),
            Ok(None) => {}
            Err(e) => log::warn!(
                "Failed to refresh training {} after registration: {e}",
                created.training_id
            ),
        }

        Ok(created)
    }

    pub fn update_registration<R>(&mut self, repo: &R, registration: Registration) -> StateResult<()>
    where
        R: RegistrationWriter,
    {
        let index = self
            .registrations
            .iter()
            .position(|r| r.id == registration.id)
            .ok_or(StateError::NotFound)?;

        if repo.update_registration(&registration)? == 0 {
            return Err(StateError::NotFound);
        }
        self.registrations[index] = registration;
        Ok(())
    }

    pub fn delete_registration<R>(&mut self, repo: &R, id: RegistrationId) -> StateResult<()>
    where
        R: RegistrationWriter,
    {
        if self.registration(id).is_none() {
            return Err(StateError::NotFound);
        }
        if repo.delete_registration(id)? == 0 {
            return Err(StateError::NotFound);
        }
        self.registrations.retain(|r| r.id != id);
        Ok(())
    }

    /// Persist a new training after applying the auto-close rule.
    pub fn create_training<R>(&mut self, repo: &R, training: NewTraining) -> StateResult<Training>
    where
        R: TrainingWriter,
    {
        let training = training.close_registration_if_full();
        let created = repo.create_training(&training)?;
        self.trainings.push(created.clone());
        Ok(created)
    }

    /// Overwrite a training after applying the auto-close rule.
    pub fn update_training<R>(
        &mut self,
        repo: &R,
        id: TrainingId,
        training: NewTraining,
    ) -> StateResult<Training>
    where
        R: TrainingWriter,
    {
        let index = self
            .trainings
            .iter()
            .position(|t| t.id == id)
            .ok_or(StateError::NotFound)?;

        let mut training = training.close_registration_if_full();
        training.created_at = self.trainings[index].created_at;
        if repo.update_training(id, &training)? == 0 {
            return Err(StateError::NotFound);
        }
        let updated = training.with_id(id);
        self.trainings[index] = updated.clone();
        Ok(updated)
    }

    /// Remove a training. Registrations pointing at it stay in place.
    pub fn delete_training<R>(&mut self, repo: &R, id: TrainingId) -> StateResult<Training>
    where
        R: TrainingWriter,
    {
        let index = self
            .trainings
            .iter()
            .position(|t| t.id == id)
            .ok_or(StateError::NotFound)?;

        if repo.delete_training(id)? == 0 {
            return Err(StateError::NotFound);
        }
        Ok(self.trainings.remove(index))
    }

    pub fn create_category<R>(&mut self, repo: &R, category: &NewCategory) -> StateResult<Category>
    where
        R: CategoryWriter,
    {
        let created = repo.create_category(category)?;
        self.categories.push(created.clone());
        Ok(created)
    }

    pub fn update_category<R>(&mut self, repo: &R, category: Category) -> StateResult<()>
    where
        R: CategoryWriter,
    {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == category.id)
            .ok_or(StateError::NotFound)?;

        if repo.update_category(&category)? == 0 {
            return Err(StateError::NotFound);
        }
        self.categories[index] = category;
        Ok(())
    }

    /// Remove a category. Trainings keep the dangling id.
    pub fn delete_category<R>(&mut self, repo: &R, id: CategoryId) -> StateResult<()>
    where
        R: CategoryWriter,
    {
        if self.category(id).is_none() {
            return Err(StateError::NotFound);
        }
        if repo.delete_category(id)? == 0 {
            return Err(StateError::NotFound);
        }
        self.categories.retain(|c| c.id != id);
        Ok(())
    }

    /// Append an activity entry and keep the feed within its cap.
    pub fn push_update<R>(&mut self, repo: &R, update: &NewTrainingUpdate) -> StateResult<TrainingUpdate>
    where
        R: TrainingUpdateWriter,
    {
        let created = repo.create_training_update(update)?;
        self.updates.insert(0, created.clone());
        self.updates.truncate(ACTIVITY_FEED_LIMIT);
        Ok(created)
    }

    fn replace_training(&mut self, training: Training) {
        match self.trainings.iter_mut().find(|t| t.id == training.id) {
            Some(existing) => *existing = training,
            None => self.trainings.push(training),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        EnrollmentStatus, ParticipantEmail, ParticipantName, TrainingName, TrainingUpdateKind,
    };
    use crate::repository::test::TestRepository;
    use crate::repository::test::fixtures::{at, category, new_training, registration, training};

    fn seeded() -> TestRepository {
        TestRepository::new()
            .with_categories(vec![category(1, "Safety"), category(2, "Leadership")])
            .with_trainings(vec![training(10, "Fire drill", 1), training(11, "Coaching", 2)])
            .with_registrations(vec![
                registration(100, 10, "Jane Doe", "jane@example.com", EnrollmentStatus::Registered),
                registration(101, 11, "Bob Roe", "bob@example.com", EnrollmentStatus::Confirmed),
            ])
    }

    fn feed_entry(minute: u32) -> NewTrainingUpdate {
        NewTrainingUpdate {
            kind: TrainingUpdateKind::Updated,
            training_id: None,
            training_name: TrainingName::new("Fire drill").unwrap(),
            message: format!("edit {minute}"),
            timestamp: at(2, 10, minute),
            previous_value: None,
            new_value: None,
        }
    }

    #[test]
    fn getters_resolve_cached_records() {
        let repo = seeded();
        let state = TrainingState::load(&repo).unwrap();

        assert_eq!(state.trainings().len(), 2);
        assert!(state.category(CategoryId::new(2).unwrap()).is_some());
        assert_eq!(
            state
                .registrations_for_training(TrainingId::new(10).unwrap())
                .count(),
            1
        );
        let ids = state.training_ids_for_category(CategoryId::new(1).unwrap());
        assert_eq!(ids, HashSet::from([TrainingId::new(10).unwrap()]));
    }

    #[test]
    fn create_registration_refreshes_slot_count() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();
        let new = NewRegistration::self_registration(
            TrainingId::new(10).unwrap(),
            ParticipantName::new("Ann Lee").unwrap(),
            ParticipantEmail::new("ann@example.com").unwrap(),
            None,
            at(3, 9, 0),
        );

        let created = state.create_registration(&repo, &new).unwrap();

        assert_eq!(created.status, EnrollmentStatus::Registered);
        assert_eq!(state.registrations().len(), 3);
        let training = state.training(TrainingId::new(10).unwrap()).unwrap();
        assert_eq!(training.available_slots.get(), 9);
    }

    #[test]
    fn failed_write_leaves_cache_untouched() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();
        repo.set_failing_writes(true);

        let mut changed = state
            .registration(RegistrationId::new(100).unwrap())
            .unwrap()
            .clone();
        changed.status = EnrollmentStatus::Confirmed;

        let err = state.update_registration(&repo, changed).unwrap_err();
        assert!(matches!(err, StateError::Store(_)));
        assert_eq!(
            state
                .registration(RegistrationId::new(100).unwrap())
                .unwrap()
                .status,
            EnrollmentStatus::Registered
        );

        assert!(
            state
                .delete_registration(&repo, RegistrationId::new(100).unwrap())
                .is_err()
        );
        assert_eq!(state.registrations().len(), 2);
    }

    #[test]
    fn single_item_operations_on_unknown_ids_are_not_found() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();

        let err = state
            .delete_registration(&repo, RegistrationId::new(999).unwrap())
            .unwrap_err();
        assert!(matches!(err, StateError::NotFound));

        let ghost = registration(999, 10, "Ghost", "ghost@example.com", EnrollmentStatus::Registered);
        assert!(matches!(
            state.update_registration(&repo, ghost),
            Err(StateError::NotFound)
        ));
    }

    #[test]
    fn record_missing_from_store_is_not_found() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();
        repo.remove_registration_silently(RegistrationId::new(100).unwrap());

        assert!(matches!(
            state.delete_registration(&repo, RegistrationId::new(100).unwrap()),
            Err(StateError::NotFound)
        ));
    }

    #[test]
    fn saving_full_training_closes_registration() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();

        let created = state
            .create_training(&repo, new_training("Forklift", 1, 25, 0))
            .unwrap();
        assert!(!created.is_registration_open);

        let mut edit = new_training("Fire drill", 1, 10, 0);
        edit.is_registration_open = true;
        let updated = state
            .update_training(&repo, TrainingId::new(10).unwrap(), edit)
            .unwrap();
        assert!(!updated.is_registration_open);
        assert!(
            !repo
                .stored_training(TrainingId::new(10).unwrap())
                .unwrap()
                .is_registration_open
        );
    }

    #[test]
    fn deleting_training_keeps_registrations() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();

        let removed = state
            .delete_training(&repo, TrainingId::new(10).unwrap())
            .unwrap();

        assert_eq!(removed.name.as_str(), "Fire drill");
        assert!(state.training(TrainingId::new(10).unwrap()).is_none());
        assert!(state.registration(RegistrationId::new(100).unwrap()).is_some());
        assert!(
            repo.stored_registration(RegistrationId::new(100).unwrap())
                .is_some()
        );
    }

    #[test]
    fn deleting_category_leaves_trainings_dangling() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();

        state
            .delete_category(&repo, CategoryId::new(1).unwrap())
            .unwrap();

        let training = state.training(TrainingId::new(10).unwrap()).unwrap();
        assert_eq!(training.category_id.get(), 1);
        assert!(state.category(CategoryId::new(1).unwrap()).is_none());
    }

    #[test]
    fn activity_feed_is_capped_newest_first() {
        let repo = seeded();
        let mut state = TrainingState::load(&repo).unwrap();

        for minute in 0..55 {
            state.push_update(&repo, &feed_entry(minute)).unwrap();
        }

        assert_eq!(state.updates().len(), ACTIVITY_FEED_LIMIT);
        assert_eq!(state.updates()[0].message, "edit 54");
        assert_eq!(repo.stored_updates().len(), 55);

        let reloaded = TrainingState::load(&repo).unwrap();
        assert_eq!(reloaded.updates().len(), ACTIVITY_FEED_LIMIT);
        assert_eq!(reloaded.updates()[0].message, "edit 54");
    }
}
