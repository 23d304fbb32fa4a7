//! Enrollment status transitions and attendance eligibility.
//!
//! Both rule sets are pure: they look only at the statuses involved and, for
//! attendance, at the parent training's status.

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::types::{AttendanceStatus, EnrollmentStatus, TrainingStatus};

/// Rejected status or attendance change.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot change status from {from} to {to}; allowed: {}", format_allowed(.allowed))]
    InvalidTransition {
        from: EnrollmentStatus,
        to: EnrollmentStatus,
        allowed: Vec<EnrollmentStatus>,
    },
    #[error(
        "attendance cannot be set to {attendance} while enrollment is {enrollment} and the training is not completed"
    )]
    AttendanceNotAllowed {
        enrollment: EnrollmentStatus,
        attendance: AttendanceStatus,
    },
}

fn format_allowed(allowed: &[EnrollmentStatus]) -> String {
    if allowed.is_empty() {
        return "none".to_string();
    }
    allowed
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl EnrollmentStatus {
    /// Statuses reachable in one step. Staying put is always permitted and is
    /// not listed here.
    pub const fn allowed_next(self) -> &'static [EnrollmentStatus] {
        use EnrollmentStatus::*;
        match self {
            Registered => &[PendingApproval, Confirmed, Waitlisted, OnHold, Cancelled],
            PendingApproval => &[HrApproval, Confirmed, OnHold, Cancelled],
            HrApproval => &[Confirmed, OnHold, Cancelled],
            Waitlisted => &[Confirmed, OnHold, Cancelled],
            OnHold => &[Confirmed, Cancelled],
            Confirmed => &[Cancelled],
            Cancelled => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }

    pub fn can_transition_to(self, next: EnrollmentStatus) -> bool {
        self == next || self.allowed_next().contains(&next)
    }

    pub fn validate_transition(self, next: EnrollmentStatus) -> Result<(), LifecycleError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(LifecycleError::InvalidTransition {
                from: self,
                to: next,
                allowed: self.allowed_next().to_vec(),
            })
        }
    }

    /// Changes that must be confirmed (with an optional reason) before they
    /// are applied.
    pub const fn requires_confirmation(self) -> bool {
        matches!(self, Self::Cancelled | Self::OnHold)
    }
}

impl AttendanceStatus {
    /// `attended` and `no_show` close out a registration's attendance.
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Attended | Self::NoShow)
    }
}

/// Whether `attendance` may be recorded for a registration in `enrollment`.
///
/// Final values require a confirmed enrollment or a completed training.
pub fn can_mark_attendance(
    enrollment: EnrollmentStatus,
    attendance: AttendanceStatus,
    training_status: Option<TrainingStatus>,
) -> bool {
    if !attendance.is_final() {
        return true;
    }
    enrollment == EnrollmentStatus::Confirmed || training_status == Some(TrainingStatus::Completed)
}

pub fn allowed_attendance(
    enrollment: EnrollmentStatus,
    training_status: Option<TrainingStatus>,
) -> Vec<AttendanceStatus> {
    AttendanceStatus::ALL
        .iter()
        .copied()
        .filter(|attendance| can_mark_attendance(enrollment, *attendance, training_status))
        .collect()
}

pub fn validate_attendance(
    enrollment: EnrollmentStatus,
    attendance: AttendanceStatus,
    training_status: Option<TrainingStatus>,
) -> Result<(), LifecycleError> {
    if can_mark_attendance(enrollment, attendance, training_status) {
        Ok(())
    } else {
        Err(LifecycleError::AttendanceNotAllowed {
            enrollment,
            attendance,
        })
    }
}

/// Appends a timestamped reason line to registration notes.
///
/// Blank reasons leave the notes unchanged.
pub fn append_note(
    notes: Option<&str>,
    label: &str,
    reason: Option<&str>,
    at: NaiveDateTime,
) -> Option<String> {
    let reason = match reason.map(str::trim) {
        Some(reason) if !reason.is_empty() => reason,
        _ => return notes.map(str::to_string),
    };
    let line = format!("[{}] {label}: {reason}", at.format("%Y-%m-%d %H:%M"));
    match notes.map(str::trim_end) {
        Some(existing) if !existing.is_empty() => Some(format!("{existing}\n{line}")),
        _ => Some(line),
    }
}

/// How strictly admin status and attendance changes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LifecyclePolicy {
    /// Reject status changes outside the transition graph.
    pub enforce_transitions: bool,
    /// Reject final attendance values for ineligible registrations, in both
    /// single and bulk updates.
    pub enforce_attendance: bool,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            enforce_transitions: true,
            enforce_attendance: true,
        }
    }
}

impl LifecyclePolicy {
    pub fn check_transition(
        &self,
        from: EnrollmentStatus,
        to: EnrollmentStatus,
    ) -> Result<(), LifecycleError> {
        if self.enforce_transitions {
            from.validate_transition(to)
        } else {
            Ok(())
        }
    }

    pub fn check_attendance(
        &self,
        enrollment: EnrollmentStatus,
        attendance: AttendanceStatus,
        training_status: Option<TrainingStatus>,
    ) -> Result<(), LifecycleError> {
        if self.enforce_attendance {
            validate_attendance(enrollment, attendance, training_status)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EnrollmentStatus::*;
    use chrono::NaiveDate;

    fn expected(from: EnrollmentStatus) -> &'static [EnrollmentStatus] {
        match from {
            Registered => &[PendingApproval, Confirmed, Waitlisted, OnHold, Cancelled],
            PendingApproval => &[HrApproval, Confirmed, OnHold, Cancelled],
            HrApproval => &[Confirmed, OnHold, Cancelled],
            Waitlisted => &[Confirmed, OnHold, Cancelled],
            OnHold => &[Confirmed, Cancelled],
            Confirmed => &[Cancelled],
            Cancelled => &[],
        }
    }

    #[test]
    fn transition_table_matches_every_pair() {
        for from in EnrollmentStatus::ALL {
            for to in EnrollmentStatus::ALL {
                let valid = from == to || expected(*from).contains(to);
                assert_eq!(
                    from.can_transition_to(*to),
                    valid,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(Cancelled.allowed_next().is_empty());
        assert!(Cancelled.is_terminal());
        assert!(Cancelled.can_transition_to(Cancelled));
        assert!(!Confirmed.is_terminal());
    }

    #[test]
    fn on_hold_cannot_move_to_waitlisted() {
        let err = OnHold.validate_transition(Waitlisted).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: OnHold,
                to: Waitlisted,
                allowed: vec![Confirmed, Cancelled],
            }
        );
        assert_eq!(
            err.to_string(),
            "cannot change status from on_hold to waitlisted; allowed: confirmed, cancelled"
        );
    }

    #[test]
    fn terminal_error_lists_no_allowed_statuses() {
        let err = Cancelled.validate_transition(Registered).unwrap_err();
        assert!(err.to_string().ends_with("allowed: none"));
    }

    #[test]
    fn attendance_gated_on_confirmation_or_completion() {
        for status in EnrollmentStatus::ALL {
            for training in [
                None,
                Some(TrainingStatus::Scheduled),
                Some(TrainingStatus::Completed),
            ] {
                let expected =
                    *status == Confirmed || training == Some(TrainingStatus::Completed);
                assert_eq!(
                    can_mark_attendance(*status, AttendanceStatus::Attended, training),
                    expected
                );
                assert_eq!(
                    can_mark_attendance(*status, AttendanceStatus::NoShow, training),
                    expected
                );
                assert!(can_mark_attendance(
                    *status,
                    AttendanceStatus::Pending,
                    training
                ));
            }
        }
    }

    #[test]
    fn allowed_attendance_lists_only_pending_for_unconfirmed() {
        assert_eq!(
            allowed_attendance(Registered, Some(TrainingStatus::Scheduled)),
            vec![AttendanceStatus::Pending]
        );
        assert_eq!(
            allowed_attendance(Registered, Some(TrainingStatus::Completed)),
            AttendanceStatus::ALL.to_vec()
        );
    }

    #[test]
    fn confirmation_required_for_cancel_and_hold() {
        let gated: Vec<_> = EnrollmentStatus::ALL
            .iter()
            .filter(|s| s.requires_confirmation())
            .copied()
            .collect();
        assert_eq!(gated, vec![Cancelled, OnHold]);
    }

    #[test]
    fn append_note_adds_timestamped_line() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        assert_eq!(
            append_note(None, "Cancelled", Some("sick"), at).as_deref(),
            Some("[2026-03-14 09:30] Cancelled: sick")
        );
        assert_eq!(
            append_note(Some("first"), "On Hold", Some(" budget "), at).as_deref(),
            Some("first\n[2026-03-14 09:30] On Hold: budget")
        );
        assert_eq!(
            append_note(Some("first"), "Cancelled", Some("  "), at).as_deref(),
            Some("first")
        );
        assert_eq!(append_note(None, "Cancelled", None, at), None);
    }

    #[test]
    fn relaxed_policy_skips_checks() {
        let policy = LifecyclePolicy {
            enforce_transitions: false,
            enforce_attendance: false,
        };
        assert!(policy.check_transition(Cancelled, Registered).is_ok());
        assert!(
            policy
                .check_attendance(Registered, AttendanceStatus::Attended, None)
                .is_ok()
        );
        assert!(
            LifecyclePolicy::default()
                .check_transition(Cancelled, Registered)
                .is_err()
        );
    }
}
