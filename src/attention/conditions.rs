//! Condition library.
//!
//! Named predicates over assignments and articles. Each returns a short
//! explanation when the situation needs a human, or the empty string when
//! everything is fine. Callers branch on "non-empty", so the empty string
//! is the only no-attention signal.

use crate::models::account::AccountId;
use crate::models::assignment::{ReviewAssignment, RevisionRequest};
use crate::models::reminder::{Reminder, ReminderCode};
use chrono::NaiveDate;

/// An accepted report whose due date has passed and which is not complete.
/// Declined or completed reports are never late.
pub fn is_late(assignment: &ReviewAssignment, today: NaiveDate) -> String {
    if assignment.date_accepted.is_some()
        && assignment.date_complete.is_none()
        && assignment.date_due < today
    {
        "The review is late".to_string()
    } else {
        String::new()
    }
}

/// An invitation with no answer either way after the grace period.
pub fn is_late_invitation(
    assignment: &ReviewAssignment,
    today: NaiveDate,
    grace_days: i64,
) -> String {
    let deadline = assignment.date_requested.date_naive() + chrono::Duration::days(grace_days);
    if assignment.is_unanswered() && deadline < today {
        "The reviewer has not answered the invitation".to_string()
    } else {
        String::new()
    }
}

/// No assignment of this round is open or was completed without decline.
pub fn needs_assignment(assignments: &[ReviewAssignment], round: u32) -> String {
    let covered = assignments
        .iter()
        .filter(|a| a.review_round == round)
        .any(|a| a.is_open() || a.is_done());
    if covered {
        String::new()
    } else {
        "You should select a reviewer".to_string()
    }
}

/// At least one completed, non-declined assignment and no open one left.
pub fn all_assignments_completed(assignments: &[ReviewAssignment], round: u32) -> String {
    let in_round: Vec<_> = assignments
        .iter()
        .filter(|a| a.review_round == round)
        .collect();
    let any_done = in_round.iter().any(|a| a.is_done());
    let any_open = in_round.iter().any(|a| a.is_open());
    if any_done && !any_open {
        "All reviews are ready, you should write the decision".to_string()
    } else {
        String::new()
    }
}

/// Any assignment of the round late as invitation or as report.
pub fn one_review_assignment_late(
    assignments: &[ReviewAssignment],
    round: u32,
    today: NaiveDate,
    grace_days: i64,
) -> String {
    for assignment in assignments.iter().filter(|a| a.review_round == round) {
        if !is_late(assignment, today).is_empty() {
            return "A review is late".to_string();
        }
        if !is_late_invitation(assignment, today, grace_days).is_empty() {
            return "A review invitation has no answer".to_string();
        }
    }
    String::new()
}

/// The editor reviews their own article and that report is late.
pub fn editor_as_reviewer_is_late(
    assignments: &[ReviewAssignment],
    round: u32,
    editor: AccountId,
    today: NaiveDate,
) -> String {
    let late = assignments
        .iter()
        .filter(|a| a.review_round == round && a.reviewer == editor)
        .any(|a| !is_late(a, today).is_empty());
    if late {
        "Your own review is late".to_string()
    } else {
        String::new()
    }
}

/// This user's own report for the round is late.
pub fn reviewer_report_is_late(
    assignments: &[ReviewAssignment],
    round: u32,
    reviewer: AccountId,
    today: NaiveDate,
) -> String {
    let late = assignments
        .iter()
        .filter(|a| a.review_round == round && a.reviewer == reviewer)
        .any(|a| !is_late(a, today).is_empty());
    if late {
        "Your review is late".to_string()
    } else {
        String::new()
    }
}

/// A pending revision request whose due date has passed.
pub fn author_revision_is_late(requests: &[RevisionRequest], today: NaiveDate) -> String {
    for request in requests {
        if request.is_pending() && request.date_due < today {
            let days = (today - request.date_due).num_days();
            return format!("The revision is {days} days late");
        }
    }
    String::new()
}

/// The last escalation reminder on an open assignment went out more than
/// `late_after_days` ago and nothing happened since.
pub fn any_reviewer_is_late_after_reminder(
    assignments: &[ReviewAssignment],
    reminders: &[Reminder],
    round: u32,
    today: NaiveDate,
    late_after_days: i64,
) -> String {
    const LAST_TIER: [ReminderCode; 2] = [
        ReminderCode::ReviewerShouldEvaluateAssignment3,
        ReminderCode::ReviewerShouldWriteReview2,
    ];
    for assignment in assignments.iter().filter(|a| a.review_round == round) {
        if !assignment.is_open() {
            continue;
        }
        let stalled = reminders.iter().any(|r| {
            r.target == crate::models::reminder::TargetRef::ReviewAssignment(assignment.id)
                && LAST_TIER.contains(&r.code)
                && r.date_sent
                    .map(|sent| {
                        sent.date_naive() + chrono::Duration::days(late_after_days) < today
                    })
                    .unwrap_or(false)
        });
        if stalled {
            return "A reviewer did not react to the last reminder".to_string();
        }
    }
    String::new()
}

/// Unconditional attention, for states where the role always has a task.
pub fn always(message: &str) -> String {
    message.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::ArticleId;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn assignment(due: NaiveDate) -> ReviewAssignment {
        ReviewAssignment::new(
            ArticleId::new(),
            AccountId::new(),
            AccountId::new(),
            1,
            due,
            Utc::now(),
        )
    }

    #[test]
    fn declined_report_is_never_late() {
        let mut a = assignment(day(1));
        a.date_declined = Some(Utc::now());
        assert!(is_late(&a, day(20)).is_empty());
    }

    #[test]
    fn accepted_overdue_report_is_late() {
        let mut a = assignment(day(1));
        a.date_accepted = Some(Utc::now());
        assert!(!is_late(&a, day(2)).is_empty());
        // Due today is not yet late
        assert!(is_late(&a, day(1)).is_empty());
    }

    #[test]
    fn unanswered_invitation_late_after_grace() {
        let mut a = assignment(day(20));
        a.date_requested = day(1).and_hms_opt(10, 0, 0).unwrap().and_utc();
        assert!(is_late_invitation(&a, day(4), 4).is_empty());
        assert!(!is_late_invitation(&a, day(6), 4).is_empty());
        a.date_accepted = Some(Utc::now());
        assert!(is_late_invitation(&a, day(6), 4).is_empty());
    }

    #[test]
    fn needs_assignment_ignores_declined() {
        let mut declined = assignment(day(10));
        declined.date_declined = Some(Utc::now());
        assert!(!needs_assignment(&[declined.clone()], 1).is_empty());

        let open = assignment(day(10));
        assert!(needs_assignment(&[declined, open], 1).is_empty());
    }

    #[test]
    fn all_completed_requires_no_open_assignment() {
        let mut done = assignment(day(10));
        done.date_accepted = Some(Utc::now());
        done.date_complete = Some(Utc::now());
        let open = assignment(day(10));

        assert!(all_assignments_completed(&[done.clone(), open], 1).is_empty());
        assert!(!all_assignments_completed(&[done], 1).is_empty());
    }

    #[test]
    fn revision_lateness_counts_days() {
        let request = RevisionRequest {
            id: crate::models::assignment::AssignmentId::new(),
            article_id: ArticleId::new(),
            author: AccountId::new(),
            review_round: 1,
            kind: crate::models::assignment::RevisionKind::Major,
            date_requested: Utc::now(),
            date_due: day(10),
            date_completed: None,
        };
        assert_eq!(
            author_revision_is_late(&[request.clone()], day(13)),
            "The revision is 3 days late"
        );
        assert!(author_revision_is_late(&[request], day(10)).is_empty());
    }
}
