use chrono::NaiveDateTime;
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::training::Training;
use crate::domain::training_update::NewTrainingUpdate;
use crate::domain::types::{TrainingId, TrainingUpdateKind};
use crate::dto::categories::CategoryDto;
use crate::dto::trainings::TrainingDto;
use crate::forms::trainings::{DeleteTrainingFormPayload, TrainingFormPayload};
use crate::repository::{
    CategoryReader, RegistrationReader, TrainingReader, TrainingUpdateReader,
    TrainingUpdateWriter, TrainingWriter,
};
use crate::services::state::{StateError, TrainingState};

use super::{ServiceError, ServiceResult, ensure_admin, load_state};

/// Admin catalogue: every training with its capacity figures, plus the
/// categories offered by the edit form.
pub fn show_trainings<R>(
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<(Vec<TrainingDto>, Vec<CategoryDto>)>
where
    R: CategoryReader + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    ensure_admin(user)?;

    let state = load_state(repo)?;
    let trainings = state
        .trainings()
        .iter()
        .map(|t| TrainingDto::new(t, state.categories()))
        .collect();
    let categories = state.categories().iter().map(CategoryDto::from).collect();
    Ok((trainings, categories))
}

pub fn add_training<R>(
    payload: TrainingFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + TrainingWriter
        + TrainingUpdateWriter,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    if state.category(payload.category_id).is_none() {
        return Err(ServiceError::Form("Selected category does not exist.".to_string()));
    }

    let created = match state.create_training(repo, payload.into_new_training(now)) {
        Ok(created) => created,
        Err(e) => {
            log::error!("Failed to create training: {e}");
            return Ok(false);
        }
    };

    record_update(
        &mut state,
        repo,
        NewTrainingUpdate {
            kind: TrainingUpdateKind::Created,
            training_id: Some(created.id),
            training_name: created.name.clone(),
            message: format!("Training \"{}\" was created", created.name),
            timestamp: now,
            previous_value: None,
            new_value: None,
        },
    );
    Ok(true)
}

pub fn update_training<R>(
    training_id: TrainingId,
    payload: TrainingFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + TrainingWriter
        + TrainingUpdateWriter,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    let previous = state
        .training(training_id)
        .cloned()
        .ok_or(ServiceError::NotFound)?;
    if state.category(payload.category_id).is_none() {
        return Err(ServiceError::Form("Selected category does not exist.".to_string()));
    }

    let updated = match state.update_training(repo, training_id, payload.into_new_training(now)) {
        Ok(updated) => updated,
        Err(StateError::NotFound) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to update training {training_id}: {e}");
            return Ok(false);
        }
    };

    record_update(&mut state, repo, describe_change(&previous, &updated, now));
    Ok(true)
}

/// Delete a training. Registrations that point at it are left in place.
pub fn delete_training<R>(
    payload: DeleteTrainingFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + TrainingWriter
        + TrainingUpdateWriter,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    let deleted = match state.delete_training(repo, payload.training_id) {
        Ok(deleted) => deleted,
        Err(StateError::NotFound) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete training {}: {e}", payload.training_id);
            return Ok(false);
        }
    };

    let orphaned = state.registrations_for_training(deleted.id).count();
    if orphaned > 0 {
        log::info!(
            "Training {} deleted with {orphaned} registrations kept",
            deleted.id
        );
    }

    record_update(
        &mut state,
        repo,
        NewTrainingUpdate {
            kind: TrainingUpdateKind::Deleted,
            training_id: None,
            training_name: deleted.name.clone(),
            message: format!("Training \"{}\" was deleted", deleted.name),
            timestamp: now,
            previous_value: None,
            new_value: None,
        },
    );
    Ok(true)
}

/// Status changes win over date changes; anything else is a plain update.
fn describe_change(previous: &Training, updated: &Training, now: NaiveDateTime) -> NewTrainingUpdate {
    let (kind, message, previous_value, new_value) = if previous.status != updated.status {
        (
            TrainingUpdateKind::StatusChanged,
            format!(
                "Training \"{}\" status changed to {}",
                updated.name,
                updated.status.label()
            ),
            Some(previous.status.label().to_string()),
            Some(updated.status.label().to_string()),
        )
    } else if previous.date != updated.date {
        (
            TrainingUpdateKind::Rescheduled,
            format!(
                "Training \"{}\" moved to {}",
                updated.name,
                updated.date.format("%Y-%m-%d")
            ),
            Some(previous.date.format("%Y-%m-%d").to_string()),
            Some(updated.date.format("%Y-%m-%d").to_string()),
        )
    } else {
        (
            TrainingUpdateKind::Updated,
            format!("Training \"{}\" was updated", updated.name),
            None,
            None,
        )
    };

    NewTrainingUpdate {
        kind,
        training_id: Some(updated.id),
        training_name: updated.name.clone(),
        message,
        timestamp: now,
        previous_value,
        new_value,
    }
}

/// The feed is best effort: a failed append never fails the mutation.
fn record_update<R>(state: &mut TrainingState, repo: &R, update: NewTrainingUpdate)
where
    R: TrainingUpdateWriter,
{
    if let Err(e) = state.push_update(repo, &update) {
        log::error!(
            "Failed to record {} update for training \"{}\": {e}",
            update.kind,
            update.training_name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EnrollmentStatus, TrainingStatus};
    use crate::forms::trainings::tests::sample_form;
    use crate::repository::test::TestRepository;
    use crate::repository::test::fixtures::{admin, at, category, member, registration, training};

    fn repo() -> TestRepository {
        TestRepository::new()
            .with_categories(vec![category(1, "Safety")])
            .with_trainings(vec![training(10, "Fire drill", 1)])
            .with_registrations(vec![registration(
                100,
                10,
                "Jane Doe",
                "jane@example.com",
                EnrollmentStatus::Registered,
            )])
    }

    fn payload() -> TrainingFormPayload {
        sample_form().try_into().unwrap()
    }

    fn id(value: i32) -> TrainingId {
        TrainingId::new(value).unwrap()
    }

    #[test]
    fn lists_trainings_with_capacity() {
        let (trainings, categories) = show_trainings(&admin(), &repo()).unwrap();

        assert_eq!(trainings.len(), 1);
        assert_eq!(trainings[0].capacity.fill_rate, 0);
        assert_eq!(trainings[0].category.as_ref().map(|c| c.id), Some(1));
        assert_eq!(categories.len(), 1);
    }

    #[test]
    fn members_cannot_edit_trainings() {
        assert!(matches!(
            add_training(payload(), &member(), &repo(), at(5, 9, 0)),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn add_training_closes_full_trainings_and_logs_feed() {
        let repo = repo();
        let mut payload = payload();
        payload.available_slots = crate::domain::types::SlotCount::new(0).unwrap();

        assert!(add_training(payload, &admin(), &repo, at(5, 9, 0)).unwrap());

        let updates = repo.stored_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].kind, TrainingUpdateKind::Created);
        let created = repo.stored_training(updates[0].training_id.unwrap()).unwrap();
        assert!(!created.is_registration_open);
    }

    #[test]
    fn update_training_requires_known_category() {
        let repo = repo();
        let mut payload = payload();
        payload.category_id = crate::domain::types::CategoryId::new(7).unwrap();

        assert!(matches!(
            update_training(id(10), payload, &admin(), &repo, at(5, 9, 0)),
            Err(ServiceError::Form(_))
        ));
        let stored = repo.stored_training(id(10)).unwrap();
        assert_eq!(stored.category_id.get(), 1);
        assert!(repo.stored_updates().is_empty());
    }

    #[test]
    fn add_training_requires_known_category() {
        let mut payload = payload();
        payload.category_id = crate::domain::types::CategoryId::new(7).unwrap();

        assert!(matches!(
            add_training(payload, &admin(), &repo(), at(5, 9, 0)),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn status_change_is_recorded_with_values() {
        let repo = repo();
        let mut payload = payload();
        payload.status = TrainingStatus::Cancelled;
        payload.date = training(10, "Fire drill", 1).date;

        assert!(update_training(id(10), payload, &admin(), &repo, at(5, 9, 0)).unwrap());

        let update = &repo.stored_updates()[0];
        assert_eq!(update.kind, TrainingUpdateKind::StatusChanged);
        assert_eq!(update.previous_value.as_deref(), Some("Scheduled"));
        assert_eq!(update.new_value.as_deref(), Some("Cancelled"));
        let stored = repo.stored_training(id(10)).unwrap();
        assert_eq!(stored.created_at, at(1, 9, 0));
        assert_eq!(stored.updated_at, at(5, 9, 0));
    }

    #[test]
    fn date_change_is_recorded_as_reschedule() {
        let repo = repo();
        let mut payload = payload();
        payload.date = chrono::NaiveDate::from_ymd_opt(2026, 5, 2).unwrap();

        assert!(update_training(id(10), payload, &admin(), &repo, at(5, 9, 0)).unwrap());

        let update = &repo.stored_updates()[0];
        assert_eq!(update.kind, TrainingUpdateKind::Rescheduled);
        assert_eq!(update.previous_value.as_deref(), Some("2026-04-01"));
        assert_eq!(update.new_value.as_deref(), Some("2026-05-02"));
    }

    #[test]
    fn update_unknown_training_is_not_found() {
        assert!(matches!(
            update_training(id(99), payload(), &admin(), &repo(), at(5, 9, 0)),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn delete_keeps_registrations_and_drops_training_link() {
        let repo = repo();
        let payload = DeleteTrainingFormPayload { training_id: id(10) };

        assert!(delete_training(payload, &admin(), &repo, at(5, 9, 0)).unwrap());

        assert!(repo.stored_training(id(10)).is_none());
        let kept = repo.stored_registration(crate::domain::types::RegistrationId::new(100).unwrap());
        assert!(kept.is_some());
        let update = &repo.stored_updates()[0];
        assert_eq!(update.kind, TrainingUpdateKind::Deleted);
        assert_eq!(update.training_id, None);
        assert_eq!(update.training_name.as_str(), "Fire drill");
    }

    #[test]
    fn failed_write_reports_false_without_feed_entry() {
        let repo = repo().failing_writes();
        let payload = DeleteTrainingFormPayload { training_id: id(10) };

        assert!(!delete_training(payload, &admin(), &repo, at(5, 9, 0)).unwrap());
        assert!(repo.stored_updates().is_empty());
    }
}
