use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::training::Training;
use crate::domain::types::TrainingId;
use crate::dto::categories::CategoryDto;
use crate::dto::trainings::TrainingDto;
use crate::forms::registrations::SelfRegistrationFormPayload;
use crate::repository::{
    CategoryReader, RegistrationReader, RegistrationWriter, TrainingReader, TrainingUpdateReader,
};

use super::{ServiceError, ServiceResult, load_state};

/// Trainings grouped the way the catalogue page shows them.
#[derive(Debug)]
pub struct IndexPage {
    pub featured: Vec<TrainingDto>,
    pub recommended: Vec<TrainingDto>,
    /// Trainings dated today or later, soonest first.
    pub upcoming: Vec<TrainingDto>,
    pub categories: Vec<CategoryDto>,
}

/// Core business logic for rendering the index page.
///
/// Any authenticated user may browse the catalogue.
pub fn show_index<R>(_user: &AuthenticatedUser, repo: &R, today: NaiveDate) -> ServiceResult<IndexPage>
where
    R: CategoryReader + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    let state = load_state(repo)?;
    let dto = |t: &Training| TrainingDto::new(t, state.categories());

    Ok(IndexPage {
        featured: state.trainings().iter().filter(|t| t.is_featured).map(dto).collect(),
        recommended: state
            .trainings()
            .iter()
            .filter(|t| t.is_recommended)
            .map(dto)
            .collect(),
        upcoming: state
            .trainings()
            .iter()
            .filter(|t| t.date >= today)
            .map(dto)
            .collect(),
        categories: state.categories().iter().map(CategoryDto::from).collect(),
    })
}

pub fn show_training<R>(
    training_id: TrainingId,
    _user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<TrainingDto>
where
    R: CategoryReader + TrainingReader,
{
    let training = match repo.get_training_by_id(training_id) {
        Ok(Some(training)) => training,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get training {training_id}: {e}");
            return Err(ServiceError::Internal);
        }
    };

    match repo.list_categories() {
        Ok(categories) => Ok(TrainingDto::new(&training, &categories)),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Sign the current user's participant up for a training.
///
/// Only internal-method trainings with open registration and a free slot
/// accept sign-ups. The new registration starts as `registered` with pending
/// attendance and takes one slot.
pub fn register_for_training<R>(
    training_id: TrainingId,
    payload: SelfRegistrationFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + RegistrationWriter,
{
    let mut state = load_state(repo)?;
    let training = state.training(training_id).ok_or(ServiceError::NotFound)?;

    if !training.accepts_self_registration() {
        return Err(ServiceError::Form(
            "Registration for this training is closed.".to_string(),
        ));
    }

    match state.create_registration(repo, &payload.into_new_registration(training_id, now)) {
        Ok(created) => {
            log::info!(
                "User {} registered participant {} for training {training_id}",
                user.email,
                created.id
            );
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to register for training {training_id}: {e}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{
        AttendanceStatus, EnrollmentStatus, ParticipantEmail, ParticipantName, RegistrationMethod,
    };
    use crate::repository::test::TestRepository;
    use crate::repository::test::fixtures::{category, member, new_training, training};

    fn tid(value: i32) -> TrainingId {
        TrainingId::new(value).unwrap()
    }

    fn payload() -> SelfRegistrationFormPayload {
        SelfRegistrationFormPayload {
            participant_name: ParticipantName::new("Jane Doe").unwrap(),
            participant_email: ParticipantEmail::new("jane@example.com").unwrap(),
            participant_phone: None,
        }
    }

    fn now() -> NaiveDateTime {
        crate::repository::test::fixtures::at(10, 12, 0)
    }

    #[test]
    fn index_groups_trainings() {
        let mut featured = training(10, "Fire drill", 1);
        featured.is_featured = true;
        let mut past = training(11, "Old course", 1);
        past.date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        past.is_recommended = true;
        let repo = TestRepository::new()
            .with_categories(vec![category(1, "Safety")])
            .with_trainings(vec![featured, past]);

        let page = show_index(&member(), &repo, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()).unwrap();

        assert_eq!(page.featured.len(), 1);
        assert_eq!(page.recommended[0].name, "Old course");
        assert_eq!(page.upcoming.len(), 1);
        assert_eq!(page.upcoming[0].id, 10);
        assert_eq!(page.categories.len(), 1);
    }

    #[test]
    fn show_unknown_training_is_not_found() {
        let repo = TestRepository::new();
        assert!(matches!(
            show_training(tid(5), &member(), &repo),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn self_registration_takes_last_slot() {
        let repo = TestRepository::new()
            .with_trainings(vec![new_training("Fire drill", 1, 10, 1).with_id(tid(10))]);

        assert!(register_for_training(tid(10), payload(), &member(), &repo, now()).unwrap());

        let stored = repo.stored_training(tid(10)).unwrap();
        assert_eq!(stored.available_slots.get(), 0);
        let registrations = repo.list_registrations().unwrap();
        assert_eq!(registrations.len(), 1);
        assert_eq!(registrations[0].status, EnrollmentStatus::Registered);
        assert_eq!(registrations[0].attendance_status, AttendanceStatus::Pending);
        assert_eq!(registrations[0].registered_at, now());

        assert!(matches!(
            register_for_training(tid(10), payload(), &member(), &repo, now()),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn closed_or_external_trainings_reject_sign_up() {
        let mut closed = new_training("Closed", 1, 10, 5).with_id(tid(10));
        closed.is_registration_open = false;
        let mut external = new_training("External", 1, 10, 5).with_id(tid(11));
        external.registration_method = RegistrationMethod::External;
        let repo = TestRepository::new().with_trainings(vec![closed, external]);

        for id in [10, 11] {
            assert!(matches!(
                register_for_training(tid(id), payload(), &member(), &repo, now()),
                Err(ServiceError::Form(_))
            ));
        }
        assert!(repo.list_registrations().unwrap().is_empty());
    }

    #[test]
    fn store_failure_reports_false() {
        let repo = TestRepository::new()
            .with_trainings(vec![training(10, "Fire drill", 1)])
            .failing_writes();

        assert!(!register_for_training(tid(10), payload(), &member(), &repo, now()).unwrap());
        assert_eq!(repo.stored_training(tid(10)).unwrap().available_slots.get(), 10);
    }
}
