use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::lifecycle::{LifecyclePolicy, append_note};
use crate::dto::OptionDto;
use crate::dto::categories::CategoryDto;
use crate::dto::registrations::RegistrationDto;
use crate::dto::trainings::TrainingDto;
use crate::forms::registrations::{
    AddRegistrationFormPayload, ChangeAttendanceFormPayload, ChangeStatusFormPayload,
    DeleteRegistrationFormPayload, RegistrationView,
};
use crate::repository::{
    CategoryReader, RegistrationReader, RegistrationWriter, TrainingReader, TrainingUpdateReader,
};
use crate::services::bulk::{BulkAction, BulkOutcome, BulkRequest, apply_bulk_action};
use crate::services::export::{ExportFile, ExportFormat, render_registrations};
use crate::services::projection::{export_rows, project};
use crate::services::state::StateError;

use super::{ServiceError, ServiceResult, ensure_admin, load_state};

/// Everything the admin registrations table renders.
#[derive(Debug)]
pub struct RegistrationsPage {
    pub registrations: Vec<RegistrationDto>,
    /// Registrations before filtering.
    pub total: usize,
    pub trainings: Vec<TrainingDto>,
    pub categories: Vec<CategoryDto>,
    pub bulk_actions: Vec<OptionDto>,
}

pub fn show_registrations<R>(
    view: &RegistrationView,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<RegistrationsPage>
where
    R: CategoryReader + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    ensure_admin(user)?;

    let state = load_state(repo)?;
    let registrations = project(
        state.registrations(),
        state.trainings(),
        &view.filters,
        view.sort,
        view.direction,
    )
    .into_iter()
    .map(|r| RegistrationDto::new(r, state.trainings()))
    .collect();

    Ok(RegistrationsPage {
        registrations,
        total: state.registrations().len(),
        trainings: state
            .trainings()
            .iter()
            .map(|t| TrainingDto::new(t, state.categories()))
            .collect(),
        categories: state.categories().iter().map(CategoryDto::from).collect(),
        bulk_actions: BulkAction::all()
            .into_iter()
            .map(|action| OptionDto {
                value: action.as_str(),
                label: action.label(),
                requires_confirmation: action.requires_confirmation(),
            })
            .collect(),
    })
}

/// Registration entered by an admin. Capacity is not checked, but the store
/// still takes a slot when one is left.
pub fn add_registration<R>(
    payload: AddRegistrationFormPayload,
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
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    if state.training(payload.training_id).is_none() {
        return Err(ServiceError::NotFound);
    }

    match state.create_registration(repo, &payload.into_new_registration(now)) {
        Ok(created) => {
            log::info!(
                "Registration {} added to training {}",
                created.id,
                created.training_id
            );
            Ok(true)
        }
        Err(e) => {
            log::error!("Failed to add registration: {e}");
            Ok(false)
        }
    }
}

/// Change one registration's status. The optional reason is appended to the
/// notes.
pub fn change_registration_status<R>(
    payload: ChangeStatusFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    policy: &LifecyclePolicy,
    now: NaiveDateTime,
) -> ServiceResult<bool>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + RegistrationWriter,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    let current = state
        .registration(payload.registration_id)
        .ok_or(ServiceError::NotFound)?;

    policy.check_transition(current.status, payload.status)?;

    let mut updated = current.clone();
    updated.notes = append_note(
        current.notes.as_deref(),
        payload.status.label(),
        payload.reason.as_deref(),
        now,
    );
    updated.status = payload.status;

    match state.update_registration(repo, updated) {
        Ok(()) => Ok(true),
        Err(StateError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!(
                "Failed to change status of registration {}: {e}",
                payload.registration_id
            );
            Ok(false)
        }
    }
}

pub fn change_attendance<R>(
    payload: ChangeAttendanceFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
    policy: &LifecyclePolicy,
) -> ServiceResult<bool>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + RegistrationWriter,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    let current = state
        .registration(payload.registration_id)
        .ok_or(ServiceError::NotFound)?;
    let training_status = state.training(current.training_id).map(|t| t.status);

    policy.check_attendance(current.status, payload.attendance_status, training_status)?;

    let mut updated = current.clone();
    updated.attendance_status = payload.attendance_status;

    match state.update_registration(repo, updated) {
        Ok(()) => Ok(true),
        Err(StateError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!(
                "Failed to change attendance of registration {}: {e}",
                payload.registration_id
            );
            Ok(false)
        }
    }
}

/// Deleting never gives the slot back to the training.
pub fn delete_registration<R>(
    payload: DeleteRegistrationFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<bool>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + RegistrationWriter,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    match state.delete_registration(repo, payload.registration_id) {
        Ok(()) => Ok(true),
        Err(StateError::NotFound) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!(
                "Failed to delete registration {}: {e}",
                payload.registration_id
            );
            Ok(false)
        }
    }
}

pub fn bulk_update_registrations<R>(
    request: BulkRequest,
    user: &AuthenticatedUser,
    repo: &R,
    policy: &LifecyclePolicy,
    now: NaiveDateTime,
) -> ServiceResult<BulkOutcome>
where
    R: CategoryReader
        + TrainingReader
        + RegistrationReader
        + TrainingUpdateReader
        + RegistrationWriter,
{
    ensure_admin(user)?;

    let mut state = load_state(repo)?;
    Ok(apply_bulk_action(&mut state, repo, request, policy, now)?)
}

/// Render the current table view as a download named after `today`.
pub fn export_registrations<R>(
    view: &RegistrationView,
    format: ExportFormat,
    user: &AuthenticatedUser,
    repo: &R,
    today: NaiveDate,
) -> ServiceResult<ExportFile>
where
    R: CategoryReader + TrainingReader + RegistrationReader + TrainingUpdateReader,
{
    ensure_admin(user)?;

    let state = load_state(repo)?;
    let selected = project(
        state.registrations(),
        state.trainings(),
        &view.filters,
        view.sort,
        view.direction,
    );
    let rows = export_rows(&selected, state.trainings(), state.categories());
    let base_name = format!("registrations-{}", today.format("%Y-%m-%d"));

    render_registrations(&base_name, format, rows).map_err(|e| {
        log::error!("Failed to export registrations: {e}");
        ServiceError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EnrollmentStatus::*;
    use crate::domain::types::{
        AttendanceStatus, EnrollmentStatus, ParticipantEmail, ParticipantName, RegistrationId,
        TrainingId, TrainingStatus,
    };
    use crate::repository::test::TestRepository;
    use crate::repository::test::fixtures::{
        admin, at, category, member, new_training, registration, training,
    };
    use crate::services::bulk::Confirmation;
    use crate::services::projection::RegistrationFilters;

    fn rid(value: i32) -> RegistrationId {
        RegistrationId::new(value).unwrap()
    }

    fn repo() -> TestRepository {
        TestRepository::new()
            .with_categories(vec![category(1, "Safety")])
            .with_trainings(vec![
                new_training("Fire drill", 1, 10, 1).with_id(TrainingId::new(10).unwrap()),
            ])
            .with_registrations(vec![
                registration(1, 10, "Jane Doe", "jane@example.com", Registered),
                registration(2, 10, "Bob Roe", "bob@example.com", Confirmed),
                registration(3, 10, "Ann Lee", "ann@example.com", OnHold),
            ])
    }

    fn add_payload() -> AddRegistrationFormPayload {
        AddRegistrationFormPayload {
            training_id: TrainingId::new(10).unwrap(),
            participant_name: ParticipantName::new("Tom Poe").unwrap(),
            participant_email: ParticipantEmail::new("tom@example.com").unwrap(),
            participant_phone: None,
            status: EnrollmentStatus::Confirmed,
            notes: None,
        }
    }

    #[test]
    fn table_applies_filters_and_offers_bulk_actions() {
        let view = RegistrationView {
            filters: RegistrationFilters {
                status: Some(Confirmed),
                ..Default::default()
            },
            ..Default::default()
        };

        let page = show_registrations(&view, &admin(), &repo()).unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.registrations.len(), 1);
        assert_eq!(page.registrations[0].participant_name, "Bob Roe");
        assert!(
            page.bulk_actions
                .iter()
                .any(|a| a.value == "delete" && a.requires_confirmation)
        );
    }

    #[test]
    fn members_cannot_see_registrations() {
        assert!(matches!(
            show_registrations(&RegistrationView::default(), &member(), &repo()),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn add_registration_takes_a_slot_but_never_below_zero() {
        let repo = repo();
        let training_id = TrainingId::new(10).unwrap();

        assert!(add_registration(add_payload(), &admin(), &repo, at(3, 9, 0)).unwrap());
        assert_eq!(repo.stored_training(training_id).unwrap().available_slots.get(), 0);

        assert!(add_registration(add_payload(), &admin(), &repo, at(3, 9, 5)).unwrap());
        assert_eq!(repo.stored_training(training_id).unwrap().available_slots.get(), 0);
    }

    #[test]
    fn add_registration_for_unknown_training_is_not_found() {
        let mut payload = add_payload();
        payload.training_id = TrainingId::new(77).unwrap();

        assert!(matches!(
            add_registration(payload, &admin(), &repo(), at(3, 9, 0)),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn status_change_appends_reason() {
        let repo = repo();
        let payload = ChangeStatusFormPayload {
            registration_id: rid(1),
            status: Cancelled,
            reason: Some("sick".into()),
        };

        assert!(
            change_registration_status(payload, &admin(), &repo, &LifecyclePolicy::default(), at(4, 8, 15))
                .unwrap()
        );

        let stored = repo.stored_registration(rid(1)).unwrap();
        assert_eq!(stored.status, Cancelled);
        assert_eq!(stored.notes.as_deref(), Some("[2026-03-04 08:15] Cancelled: sick"));
    }

    #[test]
    fn invalid_transition_is_a_form_error_naming_allowed_statuses() {
        let payload = ChangeStatusFormPayload {
            registration_id: rid(3),
            status: Waitlisted,
            reason: None,
        };

        match change_registration_status(payload, &admin(), &repo(), &LifecyclePolicy::default(), at(4, 8, 0)) {
            Err(ServiceError::Form(message)) => {
                assert!(message.contains("on_hold"));
                assert!(message.contains("confirmed, cancelled"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn relaxed_policy_allows_any_transition() {
        let repo = repo();
        let policy = LifecyclePolicy {
            enforce_transitions: false,
            enforce_attendance: true,
        };
        let payload = ChangeStatusFormPayload {
            registration_id: rid(3),
            status: Waitlisted,
            reason: None,
        };

        assert!(change_registration_status(payload, &admin(), &repo, &policy, at(4, 8, 0)).unwrap());
        assert_eq!(repo.stored_registration(rid(3)).unwrap().status, Waitlisted);
    }

    #[test]
    fn attendance_requires_confirmation_or_completed_training() {
        let repo = repo();
        let policy = LifecyclePolicy::default();
        let unconfirmed = ChangeAttendanceFormPayload {
            registration_id: rid(1),
            attendance_status: AttendanceStatus::Attended,
        };
        assert!(matches!(
            change_attendance(unconfirmed, &admin(), &repo, &policy),
            Err(ServiceError::Form(_))
        ));

        let confirmed = ChangeAttendanceFormPayload {
            registration_id: rid(2),
            attendance_status: AttendanceStatus::NoShow,
        };
        assert!(change_attendance(confirmed, &admin(), &repo, &policy).unwrap());
        assert_eq!(
            repo.stored_registration(rid(2)).unwrap().attendance_status,
            AttendanceStatus::NoShow
        );
    }

    #[test]
    fn completed_training_unlocks_attendance() {
        let mut done = training(11, "Archived", 1);
        done.status = TrainingStatus::Completed;
        let repo = TestRepository::new()
            .with_trainings(vec![done])
            .with_registrations(vec![registration(5, 11, "Kim Yu", "kim@example.com", Registered)]);

        let payload = ChangeAttendanceFormPayload {
            registration_id: rid(5),
            attendance_status: AttendanceStatus::Attended,
        };
        assert!(change_attendance(payload, &admin(), &repo, &LifecyclePolicy::default()).unwrap());
    }

    #[test]
    fn delete_does_not_restore_slot() {
        let repo = repo();
        let training_id = TrainingId::new(10).unwrap();

        assert!(delete_registration(DeleteRegistrationFormPayload { registration_id: rid(2) }, &admin(), &repo).unwrap());

        assert!(repo.stored_registration(rid(2)).is_none());
        assert_eq!(repo.stored_training(training_id).unwrap().available_slots.get(), 1);
        assert!(matches!(
            delete_registration(DeleteRegistrationFormPayload { registration_id: rid(2) }, &admin(), &repo),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn bulk_errors_become_form_errors() {
        let request = BulkRequest {
            action: BulkAction::Delete,
            ids: vec![rid(1)],
            confirmation: None,
        };

        assert!(matches!(
            bulk_update_registrations(request, &admin(), &repo(), &LifecyclePolicy::default(), at(4, 8, 0)),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn bulk_delete_posted_without_confirming_keeps_registrations() {
        let repo = repo();
        let form = crate::forms::registrations::BulkActionForm {
            action: "delete".into(),
            ids: "1,2".into(),
            confirmed: Some(String::new()),
            reason: Some(String::new()),
        };
        let request: BulkRequest = form.try_into().unwrap();

        assert!(matches!(
            bulk_update_registrations(request, &admin(), &repo, &LifecyclePolicy::default(), at(4, 8, 0)),
            Err(ServiceError::Form(_))
        ));
        assert!(repo.stored_registration(rid(1)).is_some());
        assert!(repo.stored_registration(rid(2)).is_some());
    }

    #[test]
    fn on_hold_with_reason_is_noted() {
        let repo = repo();
        let payload = ChangeStatusFormPayload {
            registration_id: rid(1),
            status: OnHold,
            reason: Some("Waiting for budget".into()),
        };

        assert!(
            change_registration_status(payload, &admin(), &repo, &LifecyclePolicy::default(), at(4, 9, 30))
                .unwrap()
        );

        let stored = repo.stored_registration(rid(1)).unwrap();
        assert_eq!(stored.status, OnHold);
        assert_eq!(
            stored.notes.as_deref(),
            Some("[2026-03-04 09:30] On Hold: Waiting for budget")
        );
    }

    #[test]
    fn bulk_confirm_counts_successes() {
        let repo = repo();
        let request = BulkRequest {
            action: BulkAction::Status(Confirmed),
            ids: vec![rid(1), rid(3), rid(42)],
            confirmation: None,
        };

        let outcome = bulk_update_registrations(request, &admin(), &repo, &LifecyclePolicy::default(), at(4, 8, 0))
            .unwrap();

        assert_eq!(outcome.requested, 3);
        assert_eq!(outcome.success_count, 2);

        let request = BulkRequest {
            action: BulkAction::Delete,
            ids: vec![rid(1)],
            confirmation: Some(Confirmation::default()),
        };
        let outcome = bulk_update_registrations(request, &admin(), &repo, &LifecyclePolicy::default(), at(4, 8, 0))
            .unwrap();
        assert_eq!(outcome.success_count, 1);
    }

    #[test]
    fn export_uses_current_view() {
        let view = RegistrationView {
            filters: RegistrationFilters {
                search: Some("bob".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let today = chrono::NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();

        let file = export_registrations(&view, ExportFormat::Csv, &admin(), &repo(), today).unwrap();

        assert_eq!(file.file_name, "registrations-2026-03-20.csv");
        let body = String::from_utf8(file.bytes).unwrap();
        assert_eq!(body.lines().count(), 2);
        assert!(body.contains("Bob Roe,bob@example.com,,Fire drill,Safety,2026-04-01"));
    }
}
