//! Applying one action to a selection of registrations.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::domain::lifecycle::{LifecyclePolicy, append_note};
use crate::domain::registration::Registration;
use crate::domain::types::{AttendanceStatus, EnrollmentStatus, RegistrationId};
use crate::repository::RegistrationWriter;
use crate::services::state::{StateError, TrainingState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Status(EnrollmentStatus),
    Attendance(AttendanceStatus),
    Notify,
    Delete,
}

impl BulkAction {
    pub const NOTIFY: &'static str = "notify";
    pub const DELETE: &'static str = "delete";

    /// Every action offered on the registrations table.
    pub fn all() -> Vec<BulkAction> {
        EnrollmentStatus::ALL
            .iter()
            .copied()
            .map(Self::Status)
            .chain(AttendanceStatus::ALL.iter().copied().map(Self::Attendance))
            .chain([Self::Notify, Self::Delete])
            .collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status(status) => status.as_str(),
            Self::Attendance(attendance) => attendance.as_str(),
            Self::Notify => Self::NOTIFY,
            Self::Delete => Self::DELETE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Status(status) => status.label(),
            Self::Attendance(attendance) => attendance.label(),
            Self::Notify => "Notify",
            Self::Delete => "Delete",
        }
    }

    /// Deletes and terminal or suspending status changes need an explicit
    /// confirmation step.
    pub fn requires_confirmation(self) -> bool {
        match self {
            Self::Delete => true,
            Self::Status(status) => status.requires_confirmation(),
            Self::Attendance(_) | Self::Notify => false,
        }
    }
}

impl Display for BulkAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BulkAction {
    type Error = BulkError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        match value {
            Self::NOTIFY => return Ok(Self::Notify),
            Self::DELETE => return Ok(Self::Delete),
            _ => {}
        }
        if let Ok(status) = EnrollmentStatus::try_from(value) {
            return Ok(Self::Status(status));
        }
        if let Ok(attendance) = AttendanceStatus::try_from(value) {
            return Ok(Self::Attendance(attendance));
        }
        Err(BulkError::UnknownAction(value.to_string()))
    }
}

/// Answer to the confirmation step. The reason is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Confirmation {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRequest {
    pub action: BulkAction,
    pub ids: Vec<RegistrationId>,
    pub confirmation: Option<Confirmation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Distinct ids in the selection.
    pub requested: usize,
    /// Targets whose write succeeded.
    pub success_count: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BulkError {
    #[error("unknown bulk action: {0}")]
    UnknownAction(String),
    #[error("no registrations selected")]
    EmptySelection,
    #[error("\"{}\" must be confirmed before it is applied", .0.label())]
    ConfirmationRequired(BulkAction),
}

/// Apply `request` to every selected registration.
///
/// Ids missing from the cache or the store, failed writes and changes the
/// lifecycle policy rejects are skipped and not counted. The batch is never
/// aborted part way.
pub fn apply_bulk_action<R>(
    state: &mut TrainingState,
    repo: &R,
    request: BulkRequest,
    policy: &LifecyclePolicy,
    now: NaiveDateTime,
) -> Result<BulkOutcome, BulkError>
where
    R: RegistrationWriter,
{
    if request.ids.is_empty() {
        return Err(BulkError::EmptySelection);
    }
    if request.action.requires_confirmation() && request.confirmation.is_none() {
        return Err(BulkError::ConfirmationRequired(request.action));
    }

    let reason = request
        .confirmation
        .as_ref()
        .and_then(|c| c.reason.as_deref());

    let mut seen = HashSet::new();
    let ids: Vec<RegistrationId> = request
        .ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();

    let mut success_count = 0;
    for id in &ids {
        let result = match request.action {
            BulkAction::Delete => state.delete_registration(repo, *id),
            action => match prepare_update(state, *id, action, reason, policy, now) {
                Some(updated) => state.update_registration(repo, updated),
                None => continue,
            },
        };

        match result {
            Ok(()) => success_count += 1,
            Err(StateError::NotFound) => {
                log::debug!("Skipping missing registration {id} in bulk {}", request.action);
            }
            Err(e) => {
                log::error!("Bulk {} failed for registration {id}: {e}", request.action);
            }
        }
    }

    log::info!(
        "Bulk {} applied to {success_count} of {} registrations",
        request.action,
        ids.len()
    );

    Ok(BulkOutcome {
        requested: ids.len(),
        success_count,
    })
}

/// Build the changed record for a non-delete action, or `None` to skip it.
fn prepare_update(
    state: &TrainingState,
    id: RegistrationId,
    action: BulkAction,
    reason: Option<&str>,
    policy: &LifecyclePolicy,
    now: NaiveDateTime,
) -> Option<Registration> {
    let Some(current) = state.registration(id) else {
        log::debug!("Skipping unknown registration {id} in bulk {action}");
        return None;
    };
    let mut updated = current.clone();

    match action {
        BulkAction::Status(next) => {
            if let Err(e) = policy.check_transition(current.status, next) {
                log::warn!("Skipping registration {id}: {e}");
                return None;
            }
            updated.notes = append_note(current.notes.as_deref(), next.label(), reason, now);
            updated.status = next;
        }
        BulkAction::Attendance(attendance) => {
            let training_status = state.training(current.training_id).map(|t| t.status);
            if let Err(e) = policy.check_attendance(current.status, attendance, training_status) {
                log::warn!("Skipping registration {id}: {e}");
                return None;
            }
            updated.attendance_status = attendance;
        }
        BulkAction::Notify => updated.notified_at = Some(now),
        BulkAction::Delete => return None,
    }

    Some(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::TrainingStatus;
    use crate::repository::test::TestRepository;
    use crate::repository::test::fixtures::{at, registration, training};
    use crate::domain::types::EnrollmentStatus::*;

    fn id(value: i32) -> RegistrationId {
        RegistrationId::new(value).unwrap()
    }

    fn seeded() -> (TestRepository, TrainingState) {
        let mut completed = training(11, "Archived course", 1);
        completed.status = TrainingStatus::Completed;
        let repo = TestRepository::new()
            .with_trainings(vec![training(10, "Fire drill", 1), completed])
            .with_registrations(vec![
                registration(1, 10, "Jane Doe", "jane@example.com", Registered),
                registration(2, 10, "Bob Roe", "bob@example.com", Confirmed),
                registration(3, 10, "Ann Lee", "ann@example.com", OnHold),
                registration(4, 11, "Tom Poe", "tom@example.com", Registered),
            ]);
        let state = TrainingState::load(&repo).unwrap();
        (repo, state)
    }

    fn request(action: BulkAction, ids: &[i32], confirmed: bool) -> BulkRequest {
        BulkRequest {
            action,
            ids: ids.iter().copied().map(id).collect(),
            confirmation: confirmed.then(Confirmation::default),
        }
    }

    #[test]
    fn parses_every_offered_action() {
        for action in BulkAction::all() {
            assert_eq!(BulkAction::try_from(action.as_str()).unwrap(), action);
        }
        assert_eq!(
            BulkAction::try_from("pending").unwrap(),
            BulkAction::Attendance(AttendanceStatus::Pending)
        );
        assert!(matches!(
            BulkAction::try_from("archive"),
            Err(BulkError::UnknownAction(_))
        ));
    }

    #[test]
    fn destructive_actions_need_confirmation() {
        let (repo, mut state) = seeded();
        let policy = LifecyclePolicy::default();

        for action in [
            BulkAction::Delete,
            BulkAction::Status(Cancelled),
            BulkAction::Status(OnHold),
        ] {
            let err = apply_bulk_action(
                &mut state,
                &repo,
                request(action, &[1], false),
                &policy,
                at(5, 9, 0),
            )
            .unwrap_err();
            assert_eq!(err, BulkError::ConfirmationRequired(action));
        }
        assert_eq!(state.registrations().len(), 4);

        let outcome = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Status(Confirmed), &[1], false),
            &policy,
            at(5, 9, 0),
        )
        .unwrap();
        assert_eq!(outcome.success_count, 1);
    }

    #[test]
    fn bulk_delete_skips_missing_ids() {
        let (repo, mut state) = seeded();

        let outcome = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Delete, &[1, 999], true),
            &LifecyclePolicy::default(),
            at(5, 9, 0),
        )
        .unwrap();

        assert_eq!(outcome, BulkOutcome { requested: 2, success_count: 1 });
        assert!(state.registration(id(1)).is_none());
        assert!(repo.stored_registration(id(1)).is_none());
        assert_eq!(state.registrations().len(), 3);
    }

    #[test]
    fn cancel_with_reason_appends_note() {
        let (repo, mut state) = seeded();
        let mut req = request(BulkAction::Status(Cancelled), &[1, 2], true);
        req.confirmation = Some(Confirmation {
            reason: Some("Budget freeze".into()),
        });

        let outcome =
            apply_bulk_action(&mut state, &repo, req, &LifecyclePolicy::default(), at(5, 9, 30))
                .unwrap();

        assert_eq!(outcome.success_count, 2);
        let stored = repo.stored_registration(id(1)).unwrap();
        assert_eq!(stored.status, Cancelled);
        assert_eq!(
            stored.notes.as_deref(),
            Some("[2026-03-05 09:30] Cancelled: Budget freeze")
        );
    }

    #[test]
    fn policy_rejected_transitions_are_skipped() {
        let (repo, mut state) = seeded();

        let outcome = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Status(Waitlisted), &[1, 3], false),
            &LifecyclePolicy::default(),
            at(5, 9, 0),
        )
        .unwrap();

        assert_eq!(outcome.success_count, 1);
        assert_eq!(state.registration(id(3)).unwrap().status, OnHold);

        let relaxed = LifecyclePolicy {
            enforce_transitions: false,
            enforce_attendance: false,
        };
        let outcome = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Status(Waitlisted), &[3], false),
            &relaxed,
            at(5, 9, 0),
        )
        .unwrap();
        assert_eq!(outcome.success_count, 1);
        assert_eq!(state.registration(id(3)).unwrap().status, Waitlisted);
    }

    #[test]
    fn attendance_respects_eligibility() {
        let (repo, mut state) = seeded();

        let outcome = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Attendance(AttendanceStatus::Attended), &[1, 2, 4], false),
            &LifecyclePolicy::default(),
            at(5, 9, 0),
        )
        .unwrap();

        assert_eq!(outcome.success_count, 2);
        assert_eq!(
            state.registration(id(1)).unwrap().attendance_status,
            AttendanceStatus::Pending
        );
        assert_eq!(
            state.registration(id(2)).unwrap().attendance_status,
            AttendanceStatus::Attended
        );
        assert_eq!(
            state.registration(id(4)).unwrap().attendance_status,
            AttendanceStatus::Attended
        );
    }

    #[test]
    fn notify_stamps_time_only() {
        let (repo, mut state) = seeded();
        let now = at(6, 14, 0);

        let outcome = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Notify, &[1, 2, 2], false),
            &LifecyclePolicy::default(),
            now,
        )
        .unwrap();

        assert_eq!(outcome, BulkOutcome { requested: 2, success_count: 2 });
        let stored = repo.stored_registration(id(2)).unwrap();
        assert_eq!(stored.notified_at, Some(now));
        assert_eq!(stored.status, Confirmed);
    }

    #[test]
    fn failed_writes_are_not_counted() {
        let (repo, mut state) = seeded();
        repo.set_failing_writes(true);

        let outcome = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Notify, &[1, 2], false),
            &LifecyclePolicy::default(),
            at(5, 9, 0),
        )
        .unwrap();

        assert_eq!(outcome.success_count, 0);
        assert!(state.registration(id(1)).unwrap().notified_at.is_none());
    }

    #[test]
    fn empty_selection_is_rejected() {
        let (repo, mut state) = seeded();
        let err = apply_bulk_action(
            &mut state,
            &repo,
            request(BulkAction::Notify, &[], false),
            &LifecyclePolicy::default(),
            at(5, 9, 0),
        )
        .unwrap_err();
        assert_eq!(err, BulkError::EmptySelection);
    }
}
