use super::events::TransitionEvent;
use super::guards::{
    passes, CanBeSetRfp, GuardContext, HasTypesetterRole, IsArticleAuthor, IsArticleEditor,
    IsArticleEditorOrSupervisor, IsArticleSupervisor, IsSystem, PermissionGuard,
};
use super::states::ReviewState;
use crate::config::JournalSettings;
use crate::directory::AccountDirectory;
use crate::error::{CoreError, Result};
use crate::models::account::{AccountId, Actor};
use crate::models::article::{Article, ArticleId, ArticleWorkflow};
use crate::models::assignment::{EditorAssignment, RevisionKind, RevisionRequest};
use crate::models::reminder::TargetRef;
use crate::reminders::{groups, ReminderEngine, ReminderTarget};
use crate::storage::{ChangeSet, ReminderSelector, Repository};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::info;

/// Result of the automatic submission checks: the three-way branch taken
/// when a submitted paper is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Checks passed and an editor could be picked automatically.
    EditorFound(AccountId),
    /// Checks passed but no automatic editor candidate exists.
    NoAutomaticCandidate,
    /// Checks flagged something a human must triage.
    Inconclusive,
}

/// Submission verification collaborator. The real implementation inspects
/// journal assignment rules and the manuscript; tests plug in a fixed
/// outcome.
#[async_trait]
pub trait SubmissionVerifier: Send + Sync {
    async fn verify(&self, article: &Article) -> Result<VerificationOutcome>;
}

/// Verifier returning a fixed outcome. Useful in tests and for journals
/// that route every submission through staff triage.
pub struct FixedVerifier(pub VerificationOutcome);

#[async_trait]
impl SubmissionVerifier for FixedVerifier {
    async fn verify(&self, _article: &Article) -> Result<VerificationOutcome> {
        Ok(self.0)
    }
}

/// The article workflow state machine.
///
/// Owns transition legality, permission guards and the reminder churn each
/// transition triggers. All writes of one transition land in a single
/// [`ChangeSet`], committed atomically with a stale-state check.
pub struct WorkflowMachine {
    repo: Arc<dyn Repository>,
    directory: Arc<dyn AccountDirectory>,
    verifier: Arc<dyn SubmissionVerifier>,
    reminders: ReminderEngine,
    journal: JournalSettings,
}

impl WorkflowMachine {
    pub fn new(
        repo: Arc<dyn Repository>,
        directory: Arc<dyn AccountDirectory>,
        verifier: Arc<dyn SubmissionVerifier>,
        journal: JournalSettings,
    ) -> Self {
        let reminders = ReminderEngine::new(directory.clone());
        Self {
            repo,
            directory,
            verifier,
            reminders,
            journal,
        }
    }

    /// Whether `actor` may apply `event` to the article right now.
    ///
    /// An event not declared for the current state and a failing guard both
    /// answer false; only infrastructure errors propagate.
    pub async fn can_transition(
        &self,
        article_id: ArticleId,
        event: &TransitionEvent,
        actor: Actor,
    ) -> Result<bool> {
        let article = self.repo.article(article_id).await?;
        let workflow = self.repo.workflow(article_id).await?;

        if !transition_declared(workflow.state, event) {
            return Ok(false);
        }
        let ctx = GuardContext {
            article: &article,
            workflow: &workflow,
            actor,
            repo: self.repo.as_ref(),
            directory: self.directory.as_ref(),
        };
        for guard in guards_for(event) {
            if !passes(guard, &ctx).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Apply `event` to the article on behalf of `actor`.
    ///
    /// Guard failures surface as `PermissionDenied` and leave the workflow
    /// untouched. A concurrent writer is detected at commit time and
    /// surfaces as `StaleState`.
    pub async fn apply_transition(
        &self,
        article_id: ArticleId,
        event: &TransitionEvent,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<ReviewState> {
        let article = self.repo.article(article_id).await?;
        let workflow = self.repo.workflow(article_id).await?;
        let current = workflow.state;

        if !transition_declared(current, event) {
            return Err(CoreError::InvalidTransition {
                from: current,
                event: event.event_type().to_string(),
            });
        }

        let ctx = GuardContext {
            article: &article,
            workflow: &workflow,
            actor,
            repo: self.repo.as_ref(),
            directory: self.directory.as_ref(),
        };
        for guard in guards_for(event) {
            guard.check(&ctx).await?;
        }

        let (target, outcome) = self.resolve_target(&article, current, event).await?;
        let mut change = self
            .side_effects(&article, &workflow, event, outcome, now)
            .await?;

        let mut updated = workflow.clone();
        updated.state = target;
        updated.latest_state_change = now;
        if let TransitionEvent::EditorRequiresRevision { kind, .. } = event {
            if *kind != RevisionKind::Technical {
                updated.current_review_round += 1;
            }
        }
        change.workflow = Some(updated);
        change.expected_state = Some((article_id, current));

        self.repo.apply(change).await?;

        info!(
            article = %article_id,
            event = event.event_type(),
            from = %current,
            to = %target,
            "workflow transition applied"
        );
        Ok(target)
    }

    /// Compute the target state. The submission-processing branch resolves
    /// dynamically through the verifier, withdrawal applies from any
    /// non-terminal state; everything else is static.
    async fn resolve_target(
        &self,
        article: &Article,
        current: ReviewState,
        event: &TransitionEvent,
    ) -> Result<(ReviewState, Option<VerificationOutcome>)> {
        if matches!(event, TransitionEvent::SystemProcessesSubmission) {
            let outcome = self.verifier.verify(article).await?;
            let state = match outcome {
                VerificationOutcome::EditorFound(_) => ReviewState::EditorSelected,
                VerificationOutcome::NoAutomaticCandidate => ReviewState::EditorToBeSelected,
                VerificationOutcome::Inconclusive => ReviewState::PaperMightHaveIssues,
            };
            return Ok((state, Some(outcome)));
        }
        if matches!(event, TransitionEvent::AuthorWithdrawsPreprint) {
            return Ok((ReviewState::Withdrawn, None));
        }
        // transition_declared already vouched for the pair
        let state = static_target(current, event).ok_or_else(|| CoreError::InvalidTransition {
            from: current,
            event: event.event_type().to_string(),
        })?;
        Ok((state, None))
    }

    /// Assignment and reminder churn for a transition, as one change set.
    async fn side_effects(
        &self,
        article: &Article,
        workflow: &ArticleWorkflow,
        event: &TransitionEvent,
        outcome: Option<VerificationOutcome>,
        now: DateTime<Utc>,
    ) -> Result<ChangeSet> {
        let mut change = ChangeSet::new();
        match event {
            TransitionEvent::SystemProcessesSubmission => match outcome {
                Some(VerificationOutcome::EditorFound(editor)) => {
                    self.install_editor(&mut change, article, editor, now).await?;
                }
                Some(VerificationOutcome::NoAutomaticCandidate) => {
                    let target = ReminderTarget::Article {
                        article,
                        date_due: now.date_naive(),
                    };
                    change.create_reminders.extend(
                        self.reminders
                            .create_group(
                                &self.journal,
                                &target,
                                &groups::DIRECTOR_SHOULD_ASSIGN_EDITOR,
                                now,
                            )
                            .await?,
                    );
                }
                _ => {}
            },

            TransitionEvent::DirectorSelectsEditor { editor }
            | TransitionEvent::EditorAssignsDifferentEditor { editor } => {
                self.retire_current_editor(&mut change, article, now).await?;
                change.delete_reminders.push(ReminderSelector::codes_on(
                    TargetRef::Article(article.id),
                    groups::DIRECTOR_SHOULD_ASSIGN_EDITOR.to_vec(),
                ));
                self.install_editor(&mut change, article, *editor, now).await?;
            }

            TransitionEvent::EditorDeclinesAssignment => {
                self.retire_current_editor(&mut change, article, now).await?;
                let target = ReminderTarget::Article {
                    article,
                    date_due: now.date_naive(),
                };
                change.create_reminders.extend(
                    self.reminders
                        .create_group(
                            &self.journal,
                            &target,
                            &groups::DIRECTOR_SHOULD_ASSIGN_EDITOR,
                            now,
                        )
                        .await?,
                );
            }

            TransitionEvent::EditorWritesEditorReport
            | TransitionEvent::EditorAcceptsPaper
            | TransitionEvent::EditorRejectsPaper
            | TransitionEvent::EditorDeemsPaperNotSuitable => {
                self.drop_editor_reminders(&mut change, article).await?;
            }

            TransitionEvent::EditorRequiresRevision { kind, date_due } => {
                self.drop_editor_reminders(&mut change, article).await?;
                let editor = self
                    .repo
                    .active_editor_assignment(article.id)
                    .await?
                    .map(|a| a.editor);
                let request = RevisionRequest {
                    id: crate::models::assignment::AssignmentId::new(),
                    article_id: article.id,
                    author: article.corresponding_author,
                    review_round: workflow.current_review_round,
                    kind: *kind,
                    date_requested: now,
                    date_due: *date_due,
                    date_completed: None,
                };
                let codes: &[_] = match kind {
                    RevisionKind::Major => &groups::AUTHOR_SHOULD_SUBMIT_MAJOR_REVISION,
                    RevisionKind::Minor => &groups::AUTHOR_SHOULD_SUBMIT_MINOR_REVISION,
                    RevisionKind::Technical => {
                        &groups::AUTHOR_SHOULD_SUBMIT_TECHNICAL_REVISION
                    }
                };
                if let Some(editor) = editor {
                    let target = ReminderTarget::RevisionRequest {
                        request: &request,
                        article,
                        editor,
                    };
                    change.create_reminders.extend(
                        self.reminders
                            .create_group(&self.journal, &target, codes, now)
                            .await?,
                    );
                }
                change.upsert_revision_requests.push(request);
            }

            TransitionEvent::AuthorSubmitsAgain => {
                for mut request in self.repo.revision_requests(article.id).await? {
                    if request.is_pending() {
                        change.delete_reminders.push(ReminderSelector::all_on(
                            TargetRef::RevisionRequest(request.id),
                        ));
                        request.date_completed = Some(now);
                        change.upsert_revision_requests.push(request);
                    }
                }
                // The editor is back in charge of moving the round forward
                if let Some(assignment) =
                    self.repo.active_editor_assignment(article.id).await?
                {
                    let target = ReminderTarget::EditorAssignment {
                        assignment: &assignment,
                        article,
                        date_due: now.date_naive()
                            + Duration::days(self.journal.editor_assign_reviewer_days),
                    };
                    change.create_reminders.extend(
                        self.reminders
                            .create_group(
                                &self.journal,
                                &target,
                                &groups::EDITOR_SHOULD_SELECT_REVIEWER,
                                now,
                            )
                            .await?,
                    );
                }
            }

            TransitionEvent::AuthorWithdrawsPreprint
            | TransitionEvent::AdminDeemsPaperNotSuitable
            | TransitionEvent::AdminPublishes => {
                self.drop_all_reminders(&mut change, article.id).await?;
            }

            _ => {}
        }
        Ok(change)
    }

    /// New active editor assignment plus its select-reviewer escalation.
    async fn install_editor(
        &self,
        change: &mut ChangeSet,
        article: &Article,
        editor: AccountId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let assignment = EditorAssignment::new(article.id, editor, now);
        let target = ReminderTarget::EditorAssignment {
            assignment: &assignment,
            article,
            date_due: now.date_naive()
                + Duration::days(self.journal.editor_assign_reviewer_days),
        };
        change.create_reminders.extend(
            self.reminders
                .create_group(
                    &self.journal,
                    &target,
                    &groups::EDITOR_SHOULD_SELECT_REVIEWER,
                    now,
                )
                .await?,
        );
        change.upsert_editor_assignments.push(assignment);
        Ok(())
    }

    /// Deactivate the current editor assignment and drop its reminders.
    async fn retire_current_editor(
        &self,
        change: &mut ChangeSet,
        article: &Article,
        _now: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(mut assignment) = self.repo.active_editor_assignment(article.id).await? {
            change.delete_reminders.push(ReminderSelector::all_on(
                TargetRef::EditorAssignment(assignment.id),
            ));
            assignment.active = false;
            change.upsert_editor_assignments.push(assignment);
        }
        Ok(())
    }

    /// Drop the outstanding select-reviewer / make-decision escalations on
    /// the active editor assignment.
    async fn drop_editor_reminders(
        &self,
        change: &mut ChangeSet,
        article: &Article,
    ) -> Result<()> {
        if let Some(assignment) = self.repo.active_editor_assignment(article.id).await? {
            let mut codes = groups::EDITOR_SHOULD_SELECT_REVIEWER.to_vec();
            codes.extend(groups::EDITOR_SHOULD_MAKE_DECISION);
            change.delete_reminders.push(ReminderSelector::codes_on(
                TargetRef::EditorAssignment(assignment.id),
                codes,
            ));
        }
        Ok(())
    }

    /// Cancel every reminder on the article and on any of its assignments.
    async fn drop_all_reminders(
        &self,
        change: &mut ChangeSet,
        article_id: ArticleId,
    ) -> Result<()> {
        let mut targets: Vec<TargetRef> = self
            .repo
            .reminders_for_article(article_id)
            .await?
            .into_iter()
            .map(|r| r.target)
            .collect();
        targets.sort_by_key(|t| format!("{t}"));
        targets.dedup();
        for target in targets {
            change
                .delete_reminders
                .push(ReminderSelector::all_on(target));
        }
        Ok(())
    }

    pub fn journal(&self) -> &JournalSettings {
        &self.journal
    }

    pub fn reminder_engine(&self) -> &ReminderEngine {
        &self.reminders
    }
}

/// Whether `(current, event)` is a declared transition.
pub fn transition_declared(current: ReviewState, event: &TransitionEvent) -> bool {
    if matches!(event, TransitionEvent::SystemProcessesSubmission) {
        return current == ReviewState::Submitted;
    }
    if matches!(event, TransitionEvent::AuthorWithdrawsPreprint) {
        return !current.is_terminal();
    }
    static_target(current, event).is_some()
}

/// The static transition table. Dynamic-target and any-state events are
/// handled separately; everything else is an exhaustive (state, event)
/// pairing.
fn static_target(current: ReviewState, event: &TransitionEvent) -> Option<ReviewState> {
    use ReviewState::*;
    use TransitionEvent as E;

    let target = match (current, event) {
        (IncompleteSubmission, E::AuthorSubmitsPaper) => Submitted,

        (EditorToBeSelected, E::DirectorSelectsEditor { .. }) => EditorSelected,
        (EditorSelected, E::EditorDeclinesAssignment) => EditorToBeSelected,
        (EditorSelected | PaperHasEditorReport, E::EditorAssignsDifferentEditor { .. }) => {
            EditorSelected
        }

        (PaperMightHaveIssues, E::AdminDeemsIssuesNotImportant) => Submitted,
        (PaperMightHaveIssues, E::AdminDeemsPaperNotSuitable) => NotSuitable,
        (PaperMightHaveIssues, E::AdminRequiresResubmission) => IncompleteSubmission,

        (EditorSelected | ToBeRevised, E::EditorWritesEditorReport) => PaperHasEditorReport,
        (EditorSelected | PaperHasEditorReport, E::EditorAcceptsPaper) => Accepted,
        (EditorSelected | PaperHasEditorReport, E::EditorRejectsPaper) => Rejected,
        (EditorSelected | PaperHasEditorReport, E::EditorDeemsPaperNotSuitable) => NotSuitable,
        (EditorSelected | PaperHasEditorReport, E::EditorRequiresRevision { .. }) => {
            ToBeRevised
        }
        (ToBeRevised, E::AuthorSubmitsAgain) => EditorSelected,

        (Accepted, E::SystemVerifiesProductionRequirements) => ReadyForTypesetter,
        (ReadyForTypesetter, E::TypesetterTakesInCharge { .. }) => TypesetterSelected,
        (ReadyForTypesetter, E::SystemAssignsTypesetter { .. }) => TypesetterSelected,
        (TypesetterSelected, E::TypesetterSubmits) => Proofreading,
        (Proofreading, E::AuthorSendsCorrections) => TypesetterSelected,
        (TypesetterSelected, E::TypesetterDeemsPaperReadyForPublication) => {
            ReadyForPublication
        }
        (Proofreading, E::AuthorDeemsPaperReadyForPublication) => ReadyForPublication,
        (ReadyForPublication, E::AdminSendsBackToTypesetter) => TypesetterSelected,
        (ReadyForPublication, E::AdminPublishes) => Published,

        _ => return None,
    };
    Some(target)
}

/// The permission guards for an event, in check order.
fn guards_for(event: &TransitionEvent) -> Vec<&'static dyn PermissionGuard> {
    use TransitionEvent as E;

    static AUTHOR: IsArticleAuthor = IsArticleAuthor;
    static EDITOR: IsArticleEditor = IsArticleEditor;
    static EDITOR_OR_SUPERVISOR: IsArticleEditorOrSupervisor = IsArticleEditorOrSupervisor;
    static SUPERVISOR: IsArticleSupervisor = IsArticleSupervisor;
    static SYSTEM: IsSystem = IsSystem;
    static TYPESETTER: HasTypesetterRole = HasTypesetterRole;
    static RFP: CanBeSetRfp = CanBeSetRfp;

    match event {
        E::AuthorSubmitsPaper
        | E::AuthorSubmitsAgain
        | E::AuthorWithdrawsPreprint
        | E::AuthorSendsCorrections => vec![&AUTHOR],
        E::AuthorDeemsPaperReadyForPublication => vec![&AUTHOR, &RFP],

        E::SystemProcessesSubmission
        | E::SystemVerifiesProductionRequirements
        | E::SystemAssignsTypesetter { .. } => vec![&SYSTEM],

        E::DirectorSelectsEditor { .. }
        | E::AdminDeemsIssuesNotImportant
        | E::AdminDeemsPaperNotSuitable
        | E::AdminRequiresResubmission
        | E::AdminSendsBackToTypesetter
        | E::AdminPublishes => vec![&SUPERVISOR],

        E::EditorDeclinesAssignment | E::EditorWritesEditorReport => vec![&EDITOR],

        E::EditorAcceptsPaper
        | E::EditorRejectsPaper
        | E::EditorDeemsPaperNotSuitable
        | E::EditorRequiresRevision { .. }
        | E::EditorAssignsDifferentEditor { .. } => vec![&EDITOR_OR_SUPERVISOR],

        E::TypesetterTakesInCharge { .. } | E::TypesetterSubmits => vec![&TYPESETTER],
        E::TypesetterDeemsPaperReadyForPublication => vec![&TYPESETTER, &RFP],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rejects_undeclared_pairs() {
        assert!(static_target(
            ReviewState::IncompleteSubmission,
            &TransitionEvent::AuthorSubmitsPaper
        )
        .is_some());
        assert!(static_target(
            ReviewState::Published,
            &TransitionEvent::AuthorSubmitsPaper
        )
        .is_none());
        assert!(static_target(
            ReviewState::Submitted,
            &TransitionEvent::EditorAcceptsPaper
        )
        .is_none());
    }

    #[test]
    fn withdraw_declared_everywhere_but_terminal() {
        assert!(transition_declared(
            ReviewState::Proofreading,
            &TransitionEvent::AuthorWithdrawsPreprint
        ));
        assert!(!transition_declared(
            ReviewState::Published,
            &TransitionEvent::AuthorWithdrawsPreprint
        ));
        assert!(!transition_declared(
            ReviewState::Withdrawn,
            &TransitionEvent::AuthorWithdrawsPreprint
        ));
    }

    #[test]
    fn system_events_are_marked() {
        assert!(TransitionEvent::SystemProcessesSubmission.is_system_event());
        assert!(!TransitionEvent::AuthorSubmitsPaper.is_system_event());
    }
}
