//! Per-read computation of available actions and attention flags.
//!
//! Nothing here persists state: every call re-derives its answer from the
//! current rows, so no "needs attention" flag can ever go stale.

use super::actions::{actions_for_state, ActionSpec};
use super::conditions;
use crate::config::CoreConfig;
use crate::directory::AccountDirectory;
use crate::error::Result;
use crate::models::account::{AccountId, Role};
use crate::models::article::ArticleId;
use crate::models::assignment::AssignmentId;
use crate::roles::RoleResolver;
use crate::state_machine::states::ReviewState;
use crate::storage::Repository;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub struct AttentionEngine {
    repo: Arc<dyn Repository>,
    directory: Arc<dyn AccountDirectory>,
    config: CoreConfig,
}

impl AttentionEngine {
    pub fn new(
        repo: Arc<dyn Repository>,
        directory: Arc<dyn AccountDirectory>,
        config: CoreConfig,
    ) -> Self {
        Self {
            repo,
            directory,
            config,
        }
    }

    /// The actions `user` may trigger on the article right now, in
    /// declaration order.
    pub async fn list_available_actions(
        &self,
        article_id: ArticleId,
        user: AccountId,
    ) -> Result<Vec<&'static ActionSpec>> {
        let article = self.repo.article(article_id).await?;
        let workflow = self.repo.workflow(article_id).await?;
        let resolver = RoleResolver::new(self.repo.as_ref(), self.directory.as_ref());
        let Some(role) = resolver.resolve(&article, &workflow, user).await? else {
            return Ok(Vec::new());
        };
        Ok(actions_for_state(workflow.state)
            .iter()
            .filter(|spec| spec.permitted(&workflow, role))
            .collect())
    }

    /// Whether the article needs `user`'s attention: the first matching
    /// explanation of the per-state, per-role condition chain, or the empty
    /// string.
    pub async fn article_requires_attention(
        &self,
        article_id: ArticleId,
        user: AccountId,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let article = self.repo.article(article_id).await?;
        let workflow = self.repo.workflow(article_id).await?;
        let resolver = RoleResolver::new(self.repo.as_ref(), self.directory.as_ref());
        let Some(role) = resolver.resolve(&article, &workflow, user).await? else {
            return Ok(String::new());
        };

        let today = now.date_naive();
        let round = workflow.current_review_round;

        let flag = match (workflow.state, role) {
            (ReviewState::EditorToBeSelected, Role::Eo | Role::Director) => {
                conditions::always("An editor should be assigned")
            }
            (ReviewState::PaperMightHaveIssues, Role::Eo | Role::Director) => {
                conditions::always("The submission needs triage")
            }

            (ReviewState::EditorSelected, Role::Editor) => {
                let assignments = self.repo.review_assignments(article_id).await?;
                let reminders = self.repo.reminders_for_article(article_id).await?;
                first_non_empty([
                    conditions::needs_assignment(&assignments, round),
                    conditions::all_assignments_completed(&assignments, round),
                    conditions::editor_as_reviewer_is_late(&assignments, round, user, today),
                    conditions::any_reviewer_is_late_after_reminder(
                        &assignments,
                        &reminders,
                        round,
                        today,
                        self.config.reminder_late_after_days,
                    ),
                ])
            }
            (ReviewState::EditorSelected, Role::Eo | Role::Director) => {
                let assignments = self.repo.review_assignments(article_id).await?;
                conditions::one_review_assignment_late(
                    &assignments,
                    round,
                    today,
                    self.config.invitation_grace_days,
                )
            }
            (ReviewState::EditorSelected, Role::Reviewer) => {
                let assignments = self.repo.review_assignments(article_id).await?;
                conditions::reviewer_report_is_late(&assignments, round, user, today)
            }

            (ReviewState::ToBeRevised, Role::Author | Role::Editor) => {
                let requests = self.repo.revision_requests(article_id).await?;
                conditions::author_revision_is_late(&requests, today)
            }

            _ => String::new(),
        };
        Ok(flag)
    }

    /// Whether one review assignment needs `user`'s attention.
    pub async fn assignment_requires_attention(
        &self,
        assignment_id: AssignmentId,
        user: AccountId,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let Some(assignment) = self.repo.review_assignment(assignment_id).await? else {
            return Ok(String::new());
        };
        let today = now.date_naive();

        if assignment.editor == user {
            return Ok(first_non_empty([
                conditions::is_late_invitation(
                    &assignment,
                    today,
                    self.config.invitation_grace_days,
                ),
                conditions::is_late(&assignment, today),
            ]));
        }
        if assignment.reviewer == user {
            return Ok(conditions::is_late(&assignment, today));
        }
        Ok(String::new())
    }
}

/// Short-circuit over an already-evaluated chain: the first non-empty
/// explanation wins.
fn first_non_empty<const N: usize>(flags: [String; N]) -> String {
    flags
        .into_iter()
        .find(|f| !f.is_empty())
        .unwrap_or_default()
}
