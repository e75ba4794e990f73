//! Assignment-level operations.
//!
//! Reviewer invitations, their acceptance/decline/submission, and due-date
//! postponement. These do not move the article between states, but they
//! drive the same reminder churn as transitions and commit through the same
//! atomic change sets.

use crate::config::JournalSettings;
use crate::directory::AccountDirectory;
use crate::error::{CoreError, Result};
use crate::models::account::{AccountId, Actor};
use crate::models::article::{Article, ArticleId, ArticleWorkflow, GalleysStatus};
use crate::models::assignment::{AssignmentId, ReviewAssignment};
use crate::models::reminder::TargetRef;
use crate::reminders::{
    groups, reschedule_for_due_date_change, ReminderEngine, ReminderTarget,
};
use crate::roles::RoleResolver;
use crate::state_machine::states::ReviewState;
use crate::storage::{ChangeSet, ReminderSelector, Repository};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

/// A reviewer's answer to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerDecision {
    Accept,
    Decline,
}

/// Production-readiness flag updates, applied as a unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductionFlags {
    pub no_queries: Option<bool>,
    pub galleys_ok: Option<GalleysStatus>,
    pub no_checks_needed: Option<bool>,
}

pub struct AssignmentOps {
    repo: Arc<dyn Repository>,
    directory: Arc<dyn AccountDirectory>,
    reminders: ReminderEngine,
    journal: JournalSettings,
}

impl AssignmentOps {
    pub fn new(
        repo: Arc<dyn Repository>,
        directory: Arc<dyn AccountDirectory>,
        journal: JournalSettings,
    ) -> Self {
        let reminders = ReminderEngine::new(directory.clone());
        Self {
            repo,
            directory,
            reminders,
            journal,
        }
    }

    /// Invite a reviewer for the current round.
    ///
    /// Clears the editor's select-reviewer escalation and opens the
    /// invitation-lateness one on the new assignment.
    pub async fn assign_reviewer(
        &self,
        article_id: ArticleId,
        actor: Actor,
        reviewer: AccountId,
        date_due: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<ReviewAssignment> {
        let article = self.repo.article(article_id).await?;
        let workflow = self.repo.workflow(article_id).await?;
        self.require_state(&workflow, ReviewState::EditorSelected, "assign_reviewer")?;
        self.require_editor_or_supervisor(&article, &workflow, actor)
            .await?;

        let editor_assignment = self
            .repo
            .active_editor_assignment(article_id)
            .await?
            .ok_or_else(|| CoreError::PermissionDenied {
                user: describe(actor),
                reason: "the article has no editor in charge".to_string(),
            })?;

        let assignment = ReviewAssignment::new(
            article_id,
            reviewer,
            editor_assignment.editor,
            workflow.current_review_round,
            date_due,
            now,
        );

        let mut change = ChangeSet::new();
        change.expected_state = Some((article_id, workflow.state));
        let mut codes = groups::EDITOR_SHOULD_SELECT_REVIEWER.to_vec();
        codes.extend(groups::EDITOR_SHOULD_MAKE_DECISION);
        change.delete_reminders.push(ReminderSelector::codes_on(
            TargetRef::EditorAssignment(editor_assignment.id),
            codes,
        ));
        let target = ReminderTarget::ReviewAssignment {
            assignment: &assignment,
            article: &article,
        };
        change.create_reminders.extend(
            self.reminders
                .create_group(
                    &self.journal,
                    &target,
                    &groups::REVIEWER_SHOULD_EVALUATE,
                    now,
                )
                .await?,
        );
        change.upsert_review_assignments.push(assignment.clone());
        self.repo.apply(change).await?;

        info!(
            article = %article_id,
            assignment = %assignment.id,
            reviewer = %reviewer,
            round = assignment.review_round,
            "reviewer assigned"
        );
        Ok(assignment)
    }

    /// The reviewer answers the invitation.
    ///
    /// Accepting swaps the invitation escalation for the report-lateness
    /// one; declining clears everything on the assignment and, if the round
    /// has no other open assignment, reopens the editor's escalation.
    pub async fn evaluate_review(
        &self,
        assignment_id: AssignmentId,
        actor: Actor,
        decision: ReviewerDecision,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut assignment = self.require_assignment(assignment_id).await?;
        let article = self.repo.article(assignment.article_id).await?;
        let workflow = self.repo.workflow(assignment.article_id).await?;
        self.require_reviewer_or_supervisor(&assignment, &workflow, actor)
            .await?;
        if !assignment.is_unanswered() {
            return Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "the invitation was already answered".to_string(),
            });
        }

        let mut change = ChangeSet::new();
        change.expected_state = Some((assignment.article_id, workflow.state));

        match decision {
            ReviewerDecision::Accept => {
                assignment.date_accepted = Some(now);
                change.delete_reminders.push(ReminderSelector::codes_on(
                    TargetRef::ReviewAssignment(assignment.id),
                    groups::REVIEWER_SHOULD_EVALUATE.to_vec(),
                ));
                let target = ReminderTarget::ReviewAssignment {
                    assignment: &assignment,
                    article: &article,
                };
                change.create_reminders.extend(
                    self.reminders
                        .create_group(
                            &self.journal,
                            &target,
                            &groups::REVIEWER_SHOULD_WRITE_REVIEW,
                            now,
                        )
                        .await?,
                );
            }
            ReviewerDecision::Decline => {
                assignment.date_declined = Some(now);
                change.delete_reminders.push(ReminderSelector::all_on(
                    TargetRef::ReviewAssignment(assignment.id),
                ));
                self.resolve_round_progress(&mut change, &article, &workflow, &assignment, now)
                    .await?;
            }
        }
        change.upsert_review_assignments.push(assignment.clone());
        self.repo.apply(change).await?;

        info!(
            assignment = %assignment_id,
            decision = ?decision,
            "review invitation answered"
        );
        Ok(())
    }

    /// The reviewer turns in the report.
    pub async fn submit_review(
        &self,
        assignment_id: AssignmentId,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut assignment = self.require_assignment(assignment_id).await?;
        let article = self.repo.article(assignment.article_id).await?;
        let workflow = self.repo.workflow(assignment.article_id).await?;
        self.require_reviewer_or_supervisor(&assignment, &workflow, actor)
            .await?;
        if assignment.date_accepted.is_none() || assignment.date_complete.is_some() {
            return Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "the assignment is not awaiting a report".to_string(),
            });
        }

        assignment.date_complete = Some(now);

        let mut change = ChangeSet::new();
        change.expected_state = Some((assignment.article_id, workflow.state));
        change.delete_reminders.push(ReminderSelector::all_on(
            TargetRef::ReviewAssignment(assignment.id),
        ));
        self.resolve_round_progress(&mut change, &article, &workflow, &assignment, now)
            .await?;
        change.upsert_review_assignments.push(assignment);
        self.repo.apply(change).await?;

        info!(assignment = %assignment_id, "review submitted");
        Ok(())
    }

    /// Change a review assignment's due date, shifting its reminders under
    /// the clemency rules. The shift is computed against the old due date
    /// and committed together with the new one.
    pub async fn postpone_reviewer_due_date(
        &self,
        assignment_id: AssignmentId,
        actor: Actor,
        new_due: NaiveDate,
    ) -> Result<()> {
        let mut assignment = self.require_assignment(assignment_id).await?;
        let article = self.repo.article(assignment.article_id).await?;
        let workflow = self.repo.workflow(assignment.article_id).await?;
        self.require_editor_or_supervisor(&article, &workflow, actor)
            .await?;

        let old_due = assignment.date_due;
        let reminders = self
            .repo
            .reminders_for_target(TargetRef::ReviewAssignment(assignment.id))
            .await?;

        let mut change = ChangeSet::new();
        change.expected_state = Some((assignment.article_id, workflow.state));
        change.update_reminders = reschedule_for_due_date_change(reminders, old_due, new_due);
        assignment.date_due = new_due;
        change.upsert_review_assignments.push(assignment);
        self.repo.apply(change).await?;

        info!(
            assignment = %assignment_id,
            old_due = %old_due,
            new_due = %new_due,
            "review due date postponed"
        );
        Ok(())
    }

    /// Change a revision request's due date under the same clemency rules.
    pub async fn postpone_revision_due_date(
        &self,
        request_id: AssignmentId,
        actor: Actor,
        new_due: NaiveDate,
    ) -> Result<()> {
        let Some(mut request) = self.repo.revision_request(request_id).await? else {
            return Err(crate::error::StorageError::AssignmentNotFound(
                request_id.to_string(),
            )
            .into());
        };
        let article = self.repo.article(request.article_id).await?;
        let workflow = self.repo.workflow(request.article_id).await?;
        self.require_editor_or_supervisor(&article, &workflow, actor)
            .await?;

        let old_due = request.date_due;
        let reminders = self
            .repo
            .reminders_for_target(TargetRef::RevisionRequest(request.id))
            .await?;

        let mut change = ChangeSet::new();
        change.expected_state = Some((request.article_id, workflow.state));
        change.update_reminders = reschedule_for_due_date_change(reminders, old_due, new_due);
        request.date_due = new_due;
        change.upsert_revision_requests.push(request);
        self.repo.apply(change).await?;
        Ok(())
    }

    /// Toggle production-readiness flags during typesetting.
    pub async fn update_production_flags(
        &self,
        article_id: ArticleId,
        actor: Actor,
        flags: ProductionFlags,
    ) -> Result<()> {
        let workflow = self.repo.workflow(article_id).await?;
        let Some(user) = actor.account() else {
            return Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "only typesetters or staff may update production flags".to_string(),
            });
        };
        let resolver = RoleResolver::new(self.repo.as_ref(), self.directory.as_ref());
        let allowed = self
            .directory
            .has_role(user, crate::models::account::Role::Typesetter)
            .await?
            || resolver.is_article_supervisor(&workflow, user).await?;
        if !allowed {
            return Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "only typesetters or staff may update production flags".to_string(),
            });
        }

        let mut updated = workflow.clone();
        if let Some(v) = flags.no_queries {
            updated.production_flag_no_queries = v;
        }
        if let Some(v) = flags.galleys_ok {
            updated.production_flag_galleys_ok = v;
        }
        if let Some(v) = flags.no_checks_needed {
            updated.production_flag_no_checks_needed = v;
        }

        let mut change = ChangeSet::new();
        change.expected_state = Some((article_id, workflow.state));
        change.workflow = Some(updated);
        self.repo.apply(change).await?;
        Ok(())
    }

    /// After a decline or submission, decide what the editor owes next.
    ///
    /// Runs only when the round has no other open assignment: with at least
    /// one completed review the editor owes a decision; with none they are
    /// back to selecting a reviewer. Existing escalations are dropped first
    /// so the fresh group is exact.
    async fn resolve_round_progress(
        &self,
        change: &mut ChangeSet,
        article: &Article,
        workflow: &ArticleWorkflow,
        just_updated: &ReviewAssignment,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let round = workflow.current_review_round;
        let mut assignments = self.repo.review_assignments(article.id).await?;
        // The caller holds the updated row; the stored one is stale.
        for stored in &mut assignments {
            if stored.id == just_updated.id {
                *stored = just_updated.clone();
            }
        }

        let any_open = assignments
            .iter()
            .any(|a| a.review_round == round && a.is_open());
        if any_open {
            return Ok(());
        }
        let any_done = assignments
            .iter()
            .any(|a| a.review_round == round && a.is_done());

        let Some(editor_assignment) = self.repo.active_editor_assignment(article.id).await?
        else {
            return Ok(());
        };

        let mut codes = groups::EDITOR_SHOULD_SELECT_REVIEWER.to_vec();
        codes.extend(groups::EDITOR_SHOULD_MAKE_DECISION);
        change.delete_reminders.push(ReminderSelector::codes_on(
            TargetRef::EditorAssignment(editor_assignment.id),
            codes,
        ));

        let (group, days): (&[_], i64) = if any_done {
            (
                &groups::EDITOR_SHOULD_MAKE_DECISION,
                self.journal.editor_make_decision_days,
            )
        } else {
            (
                &groups::EDITOR_SHOULD_SELECT_REVIEWER,
                self.journal.editor_assign_reviewer_days,
            )
        };
        let target = ReminderTarget::EditorAssignment {
            assignment: &editor_assignment,
            article,
            date_due: now.date_naive() + Duration::days(days),
        };
        change.create_reminders.extend(
            self.reminders
                .create_group(&self.journal, &target, group, now)
                .await?,
        );
        Ok(())
    }

    async fn require_assignment(&self, id: AssignmentId) -> Result<ReviewAssignment> {
        self.repo
            .review_assignment(id)
            .await?
            .ok_or_else(|| crate::error::StorageError::AssignmentNotFound(id.to_string()).into())
    }

    fn require_state(
        &self,
        workflow: &ArticleWorkflow,
        state: ReviewState,
        operation: &str,
    ) -> Result<()> {
        if workflow.state == state {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: workflow.state,
                event: operation.to_string(),
            })
        }
    }

    async fn require_editor_or_supervisor(
        &self,
        article: &Article,
        workflow: &ArticleWorkflow,
        actor: Actor,
    ) -> Result<()> {
        let Some(user) = actor.account() else {
            return Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "only the editor in charge or staff may do this".to_string(),
            });
        };
        let resolver = RoleResolver::new(self.repo.as_ref(), self.directory.as_ref());
        if resolver.is_article_editor(article, user).await?
            || resolver.is_article_supervisor(workflow, user).await?
        {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "only the editor in charge or staff may do this".to_string(),
            })
        }
    }

    async fn require_reviewer_or_supervisor(
        &self,
        assignment: &ReviewAssignment,
        workflow: &ArticleWorkflow,
        actor: Actor,
    ) -> Result<()> {
        let Some(user) = actor.account() else {
            return Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "only the invited reviewer may do this".to_string(),
            });
        };
        if assignment.reviewer == user {
            return Ok(());
        }
        let resolver = RoleResolver::new(self.repo.as_ref(), self.directory.as_ref());
        if resolver.is_article_supervisor(workflow, user).await? {
            Ok(())
        } else {
            Err(CoreError::PermissionDenied {
                user: describe(actor),
                reason: "only the invited reviewer may do this".to_string(),
            })
        }
    }
}

fn describe(actor: Actor) -> String {
    match actor {
        Actor::System => "system".to_string(),
        Actor::User(id) => id.to_string(),
    }
}
