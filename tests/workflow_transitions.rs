//! End-to-end transitions through the article workflow, including the
//! reminder churn each one triggers.

mod common;

use common::{at_day, date, World};
use editorial_core::models::{Actor, GalleysStatus, ReminderCode, RevisionKind, TargetRef};
use editorial_core::ops::ProductionFlags;
use editorial_core::state_machine::{ReviewState, TransitionEvent, VerificationOutcome};
use editorial_core::storage::Repository;
use editorial_core::CoreError;

#[tokio::test]
async fn submission_with_automatic_editor_installs_assignment_and_escalation() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;

    let workflow = world.repo.workflow(article).await.unwrap();
    assert_eq!(workflow.state, ReviewState::EditorSelected);

    let assignment = world
        .repo
        .active_editor_assignment(article)
        .await
        .unwrap()
        .expect("editor in charge");
    assert_eq!(assignment.editor, world.editor);

    let reminders = world.repo.reminders_for_article(article).await.unwrap();
    let codes: Vec<_> = reminders.iter().map(|r| r.code).collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::EditorShouldSelectReviewer1,
            ReminderCode::EditorShouldSelectReviewer2,
            ReminderCode::EditorShouldSelectReviewer3,
        ]
    );
    // Base due date is assignment time plus the journal's selection window
    assert_eq!(reminders[0].date_due, date(7));
    assert_eq!(reminders[1].date_due, date(10));
    assert_eq!(reminders[2].date_due, date(12));
}

#[tokio::test]
async fn submission_without_candidate_asks_the_director() {
    let world = World::new();
    let article = world.seed_article().await;
    let machine = world.machine(VerificationOutcome::NoAutomaticCandidate);

    machine
        .apply_transition(
            article,
            &TransitionEvent::AuthorSubmitsPaper,
            Actor::User(world.author),
            at_day(0),
        )
        .await
        .unwrap();
    let state = machine
        .apply_transition(
            article,
            &TransitionEvent::SystemProcessesSubmission,
            Actor::System,
            at_day(0),
        )
        .await
        .unwrap();
    assert_eq!(state, ReviewState::EditorToBeSelected);

    let reminders = world.repo.reminders_for_article(article).await.unwrap();
    let codes: Vec<_> = reminders.iter().map(|r| r.code).collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::DirectorShouldAssignEditor1,
            ReminderCode::DirectorShouldAssignEditor2,
        ]
    );
    for reminder in &reminders {
        assert_eq!(reminder.recipient, world.director);
        assert_eq!(reminder.target, TargetRef::Article(article));
    }
}

#[tokio::test]
async fn inconclusive_submission_goes_to_staff_triage() {
    let world = World::new();
    let article = world.seed_article().await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    machine
        .apply_transition(
            article,
            &TransitionEvent::AuthorSubmitsPaper,
            Actor::User(world.author),
            at_day(0),
        )
        .await
        .unwrap();
    let state = machine
        .apply_transition(
            article,
            &TransitionEvent::SystemProcessesSubmission,
            Actor::System,
            at_day(0),
        )
        .await
        .unwrap();
    assert_eq!(state, ReviewState::PaperMightHaveIssues);
    assert!(world
        .repo
        .reminders_for_article(article)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn director_selection_swaps_director_escalation_for_editor_one() {
    let world = World::new();
    let article = world.seed_article().await;
    let machine = world.machine(VerificationOutcome::NoAutomaticCandidate);

    machine
        .apply_transition(
            article,
            &TransitionEvent::AuthorSubmitsPaper,
            Actor::User(world.author),
            at_day(0),
        )
        .await
        .unwrap();
    machine
        .apply_transition(
            article,
            &TransitionEvent::SystemProcessesSubmission,
            Actor::System,
            at_day(0),
        )
        .await
        .unwrap();
    machine
        .apply_transition(
            article,
            &TransitionEvent::DirectorSelectsEditor {
                editor: world.editor,
            },
            Actor::User(world.director),
            at_day(1),
        )
        .await
        .unwrap();

    let workflow = world.repo.workflow(article).await.unwrap();
    assert_eq!(workflow.state, ReviewState::EditorSelected);
    let codes: Vec<_> = world
        .repo
        .reminders_for_article(article)
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
async fn editor_decline_reopens_the_director_escalation() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    machine
        .apply_transition(
            article,
            &TransitionEvent::EditorDeclinesAssignment,
            Actor::User(world.editor),
            at_day(2),
        )
        .await
        .unwrap();

    let workflow = world.repo.workflow(article).await.unwrap();
    assert_eq!(workflow.state, ReviewState::EditorToBeSelected);
    assert!(world
        .repo
        .active_editor_assignment(article)
        .await
        .unwrap()
        .is_none());
    let codes: Vec<_> = world
        .repo
        .reminders_for_article(article)
        .await
        .unwrap()
        .iter()
        .map(|r| r.code)
        .collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::DirectorShouldAssignEditor1,
            ReminderCode::DirectorShouldAssignEditor2,
        ]
    );
}

#[tokio::test]
async fn permission_denied_leaves_state_and_timestamp_untouched() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let before = world.repo.workflow(article).await.unwrap();

    let machine = world.machine(VerificationOutcome::Inconclusive);
    let err = machine
        .apply_transition(
            article,
            &TransitionEvent::EditorAcceptsPaper,
            Actor::User(world.reviewer),
            at_day(3),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied { .. }));

    let after = world.repo.workflow(article).await.unwrap();
    assert_eq!(after.state, before.state);
    assert_eq!(after.latest_state_change, before.latest_state_change);
}

#[tokio::test]
async fn undeclared_transition_is_rejected() {
    let world = World::new();
    let article = world.seed_article().await;

    let machine = world.machine(VerificationOutcome::Inconclusive);
    let err = machine
        .apply_transition(
            article,
            &TransitionEvent::AdminPublishes,
            Actor::User(world.eo),
            at_day(0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));

    assert!(!machine
        .can_transition(
            article,
            &TransitionEvent::AdminPublishes,
            Actor::User(world.eo)
        )
        .await
        .unwrap());
}

#[tokio::test]
async fn can_transition_mirrors_guards() {
    let world = World::new();
    let article = world.seed_article().await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    let event = TransitionEvent::AuthorSubmitsPaper;
    assert!(machine
        .can_transition(article, &event, Actor::User(world.author))
        .await
        .unwrap());
    assert!(!machine
        .can_transition(article, &event, Actor::User(world.editor))
        .await
        .unwrap());
    assert!(!machine
        .can_transition(article, &event, Actor::System)
        .await
        .unwrap());
}

#[tokio::test]
async fn revision_request_opens_author_reminders_and_bumps_round() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    let state = machine
        .apply_transition(
            article,
            &TransitionEvent::EditorRequiresRevision {
                kind: RevisionKind::Major,
                date_due: date(30),
            },
            Actor::User(world.editor),
            at_day(5),
        )
        .await
        .unwrap();
    assert_eq!(state, ReviewState::ToBeRevised);

    let workflow = world.repo.workflow(article).await.unwrap();
    assert_eq!(workflow.current_review_round, 2);

    let requests = world.repo.revision_requests(article).await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, RevisionKind::Major);
    assert_eq!(requests[0].date_due, date(30));

    let reminders = world.repo.reminders_for_article(article).await.unwrap();
    let codes: Vec<_> = reminders.iter().map(|r| r.code).collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::AuthorShouldSubmitMajorRevision1,
            ReminderCode::AuthorShouldSubmitMajorRevision2,
        ]
    );
    // Advance warning a week before, nudge on the due date itself
    assert_eq!(reminders[0].date_due, date(23));
    assert_eq!(reminders[1].date_due, date(30));
    assert_eq!(reminders[0].recipient, world.author);
}

#[tokio::test]
async fn technical_revision_keeps_the_review_round() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    machine
        .apply_transition(
            article,
            &TransitionEvent::EditorRequiresRevision {
                kind: RevisionKind::Technical,
                date_due: date(3),
            },
            Actor::User(world.editor),
            at_day(1),
        )
        .await
        .unwrap();

    let workflow = world.repo.workflow(article).await.unwrap();
    assert_eq!(workflow.current_review_round, 1);
    let codes: Vec<_> = world
        .repo
        .reminders_for_article(article)
        .await
        .unwrap()
        .iter()
        .map(|r| r.code)
        .collect();
    assert_eq!(
        codes,
        vec![
            ReminderCode::AuthorShouldSubmitTechnicalRevision1,
            ReminderCode::AuthorShouldSubmitTechnicalRevision2,
        ]
    );
}

#[tokio::test]
async fn resubmission_closes_the_request_and_reopens_editor_escalation() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    machine
        .apply_transition(
            article,
            &TransitionEvent::EditorRequiresRevision {
                kind: RevisionKind::Minor,
                date_due: date(20),
            },
            Actor::User(world.editor),
            at_day(5),
        )
        .await
        .unwrap();
    let state = machine
        .apply_transition(
            article,
            &TransitionEvent::AuthorSubmitsAgain,
            Actor::User(world.author),
            at_day(12),
        )
        .await
        .unwrap();
    assert_eq!(state, ReviewState::EditorSelected);

    let requests = world.repo.revision_requests(article).await.unwrap();
    assert!(requests.iter().all(|r| !r.is_pending()));

    let codes: Vec<_> = world
        .repo
        .reminders_for_article(article)
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
async fn withdrawal_cancels_every_reminder_on_the_article() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;

    // Open an invitation escalation on top of the editor's one
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
    assert!(!world
        .repo
        .reminders_for_article(article)
        .await
        .unwrap()
        .is_empty());

    let machine = world.machine(VerificationOutcome::Inconclusive);
    let state = machine
        .apply_transition(
            article,
            &TransitionEvent::AuthorWithdrawsPreprint,
            Actor::User(world.author),
            at_day(1),
        )
        .await
        .unwrap();
    assert_eq!(state, ReviewState::Withdrawn);
    assert!(world
        .repo
        .reminders_for_article(article)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn withdrawal_applies_from_any_live_state_but_not_after_the_end() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    machine
        .apply_transition(
            article,
            &TransitionEvent::EditorRequiresRevision {
                kind: RevisionKind::Minor,
                date_due: date(20),
            },
            Actor::User(world.editor),
            at_day(5),
        )
        .await
        .unwrap();

    let state = machine
        .apply_transition(
            article,
            &TransitionEvent::AuthorWithdrawsPreprint,
            Actor::User(world.author),
            at_day(6),
        )
        .await
        .unwrap();
    assert_eq!(state, ReviewState::Withdrawn);

    // Withdrawn is final, a second withdrawal has nowhere to go
    let err = machine
        .apply_transition(
            article,
            &TransitionEvent::AuthorWithdrawsPreprint,
            Actor::User(world.author),
            at_day(7),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[tokio::test]
async fn production_pipeline_gates_publication_on_flags() {
    let world = World::new();
    let article = world.seed_article().await;
    world.advance_to_editor_selected(article).await;
    let machine = world.machine(VerificationOutcome::Inconclusive);

    machine
        .apply_transition(
            article,
            &TransitionEvent::EditorAcceptsPaper,
            Actor::User(world.editor),
            at_day(10),
        )
        .await
        .unwrap();
    machine
        .apply_transition(
            article,
            &TransitionEvent::SystemVerifiesProductionRequirements,
            Actor::System,
            at_day(10),
        )
        .await
        .unwrap();
    machine
        .apply_transition(
            article,
            &TransitionEvent::TypesetterTakesInCharge {
                typesetter: world.typesetter,
            },
            Actor::User(world.typesetter),
            at_day(11),
        )
        .await
        .unwrap();

    // Flags not satisfied yet
    let err = machine
        .apply_transition(
            article,
            &TransitionEvent::TypesetterDeemsPaperReadyForPublication,
            Actor::User(world.typesetter),
            at_day(12),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::PermissionDenied { .. }));

    world
        .ops()
        .update_production_flags(
            article,
            Actor::User(world.typesetter),
            ProductionFlags {
                no_queries: Some(true),
                galleys_ok: Some(GalleysStatus::TestSucceeded),
                no_checks_needed: Some(true),
            },
        )
        .await
        .unwrap();

    machine
        .apply_transition(
            article,
            &TransitionEvent::TypesetterDeemsPaperReadyForPublication,
            Actor::User(world.typesetter),
            at_day(12),
        )
        .await
        .unwrap();
    let state = machine
        .apply_transition(
            article,
            &TransitionEvent::AdminPublishes,
            Actor::User(world.eo),
            at_day(13),
        )
        .await
        .unwrap();
    assert_eq!(state, ReviewState::Published);
}
