//! Reminder creation, cancellation, clemency shifts and the periodic
//! sender, exercised through the review assignment lifecycle.

mod common;

use common::{at_day, date, World};
use editorial_core::models::{Actor, ReminderCode, TargetRef};
use editorial_core::notify::RecordingDispatcher;
use editorial_core::ops::ReviewerDecision;
use editorial_core::reminders::SenderReport;
use editorial_core::storage::Repository;
use std::sync::Arc;

#[tokio::test]
async fn assigning_a_reviewer_opens_the_invitation_escalation() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;

    let assignment = world
        .ops()
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();

    let reminders = world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
        .await
        .unwrap();
    let codes: Vec<_> = reminders.iter().map(|r| r.code).collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::ReviewerShouldEvaluateAssignment1,
            ReminderCode::ReviewerShouldEvaluateAssignment2,
            ReminderCode::ReviewerShouldEvaluateAssignment3,
        ]
    );
    // First two nudge the reviewer, the last escalates to the editor
    assert_eq!(reminders[0].recipient, world.reviewer);
    assert_eq!(reminders[1].recipient, world.reviewer);
    assert_eq!(reminders[2].recipient, world.editor);

    // The editor's own select-reviewer escalation is resolved
    let editor_assignment = world
        .repo
        .active_editor_assignment(article)
        .await
        .unwrap()
        .unwrap();
    assert!(world
        .repo
        .reminders_for_target(TargetRef::EditorAssignment(editor_assignment.id))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn acceptance_swaps_invitation_reminders_for_report_ones() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let ops = world.ops();

    let assignment = ops
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();
    ops.evaluate_review(
        assignment.id,
        Actor::User(world.reviewer),
        ReviewerDecision::Accept,
        at_day(1),
    )
    .await
    .unwrap();

    let reminders = world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
        .await
        .unwrap();
    let codes: Vec<_> = reminders.iter().map(|r| r.code).collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::ReviewerShouldWriteReview1,
            ReminderCode::ReviewerShouldWriteReview2,
        ]
    );
    assert_eq!(reminders[0].date_due, date(7));
    assert_eq!(reminders[1].date_due, date(12));
    assert_eq!(reminders[0].recipient, world.reviewer);
    assert_eq!(reminders[1].recipient, world.editor);
}

#[tokio::test]
async fn decline_with_open_peer_defers_the_editor_escalation() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let ops = world.ops();

    let first = ops
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();
    let second = ops
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.second_reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();

    let editor_assignment = world
        .repo
        .active_editor_assignment(article)
        .await
        .unwrap()
        .unwrap();
    let editor_target = TargetRef::EditorAssignment(editor_assignment.id);

    // One reviewer declines while the other invitation is still open:
    // the editor owes nothing yet.
    ops.evaluate_review(
        first.id,
        Actor::User(world.reviewer),
        ReviewerDecision::Decline,
        at_day(1),
    )
    .await
    .unwrap();
    assert!(world
        .repo
        .reminders_for_target(editor_target)
        .await
        .unwrap()
        .is_empty());
    assert!(world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(first.id))
        .await
        .unwrap()
        .is_empty());

    // The round resolves with no completed review: exactly the three
    // ascending select-reviewer reminders appear.
    ops.evaluate_review(
        second.id,
        Actor::User(world.second_reviewer),
        ReviewerDecision::Decline,
        at_day(2),
    )
    .await
    .unwrap();
    let codes: Vec<_> = world
        .repo
        .reminders_for_target(editor_target)
        .await
        .unwrap()
        .iter()
        .map(|r| r.code)
        .collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::EditorShouldSelectReviewer1,
            ReminderCode::EditorShouldSelectReviewer2,
            ReminderCode::EditorShouldSelectReviewer3,
        ]
    );
}

#[tokio::test]
async fn submitted_review_swaps_the_round_into_decision_mode() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let ops = world.ops();

    let assignment = ops
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();
    ops.evaluate_review(
        assignment.id,
        Actor::User(world.reviewer),
        ReviewerDecision::Accept,
        at_day(1),
    )
    .await
    .unwrap();
    ops.submit_review(assignment.id, Actor::User(world.reviewer), at_day(5))
        .await
        .unwrap();

    assert!(world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
        .await
        .unwrap()
        .is_empty());

    let editor_assignment = world
        .repo
        .active_editor_assignment(article)
        .await
        .unwrap()
        .unwrap();
    let reminders = world
        .repo
        .reminders_for_target(TargetRef::EditorAssignment(editor_assignment.id))
        .await
        .unwrap();
    let codes: Vec<_> = reminders.iter().map(|r| r.code).collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::EditorShouldMakeDecision1,
            ReminderCode::EditorShouldMakeDecision2,
            ReminderCode::EditorShouldMakeDecision3,
        ]
    );
    // Decision window opens from the day the last review arrived
    assert_eq!(reminders[0].date_due, date(12));
}

#[tokio::test]
async fn clemency_keeps_small_shifts_from_resending() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let ops = world.ops();
    let dispatch = Arc::new(RecordingDispatcher::new());

    let assignment = ops
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();
    ops.evaluate_review(
        assignment.id,
        Actor::User(world.reviewer),
        ReviewerDecision::Accept,
        at_day(1),
    )
    .await
    .unwrap();

    // Fire the first report reminder (due day 7, clemency 2)
    world.sender(dispatch.clone()).run_due_reminders(at_day(8)).await.unwrap();
    let sent: Vec<_> = world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.date_sent.is_some())
        .collect();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].code, ReminderCode::ReviewerShouldWriteReview1);

    // A two-day extension sits inside the clemency window: the sent
    // reminder stays sent and keeps its date.
    ops.postpone_reviewer_due_date(assignment.id, Actor::User(world.editor), date(9))
        .await
        .unwrap();
    let reminders = world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
        .await
        .unwrap();
    let first = reminders
        .iter()
        .find(|r| r.code == ReminderCode::ReviewerShouldWriteReview1)
        .unwrap();
    assert!(first.date_sent.is_some());
    assert_eq!(first.date_due, date(7));
    // The unsent escalation shifted with the due date
    let second = reminders
        .iter()
        .find(|r| r.code == ReminderCode::ReviewerShouldWriteReview2)
        .unwrap();
    assert!(second.date_sent.is_none());
    assert_eq!(second.date_due, date(14));

    // A further week is beyond clemency: the sent reminder is shifted and
    // un-sent so it fires again.
    ops.postpone_reviewer_due_date(assignment.id, Actor::User(world.editor), date(16))
        .await
        .unwrap();
    let first = world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.code == ReminderCode::ReviewerShouldWriteReview1)
        .unwrap();
    assert!(first.date_sent.is_none());
    assert_eq!(first.date_due, date(14));
}

#[tokio::test]
async fn sender_walks_the_invitation_escalation_day_by_day() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let dispatch = Arc::new(RecordingDispatcher::new());
    let sender = world.sender(dispatch.clone());

    // Invitation created at day 0, due day 7: tiers fall due on days
    // 7, 10 and 12.
    world
        .ops()
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();
    // The editor's select-reviewer escalation was consumed by assigning,
    // so only the invitation reminders can fire.

    let report = sender.run_due_reminders(at_day(8)).await.unwrap();
    assert_eq!(report, SenderReport { sent: 1, total: 1 });
    assert_eq!(dispatch.sent().len(), 1);
    assert_eq!(dispatch.sent()[0].recipient, world.reviewer);

    let report = sender.run_due_reminders(at_day(11)).await.unwrap();
    assert_eq!(report, SenderReport { sent: 1, total: 1 });
    assert_eq!(dispatch.sent().len(), 2);
    assert_eq!(dispatch.sent()[1].recipient, world.reviewer);

    let report = sender.run_due_reminders(at_day(12)).await.unwrap();
    assert_eq!(report, SenderReport { sent: 1, total: 1 });
    assert_eq!(dispatch.sent()[2].recipient, world.editor);

    // Nothing left
    let report = sender.run_due_reminders(at_day(13)).await.unwrap();
    assert_eq!(report, SenderReport { sent: 0, total: 0 });
}

#[tokio::test]
async fn rendered_text_carries_article_and_recipient() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;

    let assignment = world
        .ops()
        .assign_reviewer(
            article,
            Actor::User(world.editor),
            world.reviewer,
            date(7),
            at_day(0),
        )
        .await
        .unwrap();

    let reminders = world
        .repo
        .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
        .await
        .unwrap();
    assert!(reminders[0].subject.contains("A Study of Studies"));
    assert!(reminders[0].body.contains("Rita Reviewer"));
    assert!(!reminders[0].body.contains("{{"));
}
