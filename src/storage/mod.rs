//! Persistence collaborator.
//!
//! A state transition and the reminder churn it triggers must land together,
//! so the core never writes rows piecemeal: it computes a [`ChangeSet`] and
//! hands it to [`Repository::apply`], which commits it as one atomic unit or
//! not at all.

pub mod memory;

pub use memory::InMemoryRepository;

use crate::error::Result;
use crate::models::article::{Article, ArticleId, ArticleWorkflow};
use crate::models::assignment::{
    AssignmentId, EditorAssignment, ReviewAssignment, RevisionRequest,
};
use crate::models::reminder::{Reminder, ReminderCode, ReminderId, TargetRef};
use crate::state_machine::states::ReviewState;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

/// Selects reminders for deletion: everything on a target, or only the
/// listed codes.
#[derive(Debug, Clone)]
pub struct ReminderSelector {
    pub target: TargetRef,
    pub codes: Option<Vec<ReminderCode>>,
}

impl ReminderSelector {
    pub fn all_on(target: TargetRef) -> Self {
        Self {
            target,
            codes: None,
        }
    }

    pub fn codes_on(target: TargetRef, codes: Vec<ReminderCode>) -> Self {
        Self {
            target,
            codes: Some(codes),
        }
    }

    pub fn matches(&self, reminder: &Reminder) -> bool {
        reminder.target == self.target
            && self
                .codes
                .as_ref()
                .map(|codes| codes.contains(&reminder.code))
                .unwrap_or(true)
    }
}

/// All writes produced by one business operation, committed atomically.
///
/// `expected_state` is the optimistic-concurrency check: if set and the
/// stored workflow state differs at commit time, the whole change set is
/// rejected with a stale-state error.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub expected_state: Option<(ArticleId, ReviewState)>,
    pub workflow: Option<ArticleWorkflow>,
    pub upsert_editor_assignments: Vec<EditorAssignment>,
    pub upsert_review_assignments: Vec<ReviewAssignment>,
    pub upsert_revision_requests: Vec<RevisionRequest>,
    pub delete_reminders: Vec<ReminderSelector>,
    pub create_reminders: Vec<Reminder>,
    pub update_reminders: Vec<Reminder>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the change set carries no writes and no state check.
    /// Implementations treat an empty set as a no-op commit.
    pub fn is_empty(&self) -> bool {
        self.expected_state.is_none()
            && self.workflow.is_none()
            && self.upsert_editor_assignments.is_empty()
            && self.upsert_review_assignments.is_empty()
            && self.upsert_revision_requests.is_empty()
            && self.delete_reminders.is_empty()
            && self.create_reminders.is_empty()
            && self.update_reminders.is_empty()
    }
}

/// CRUD over workflow rows, assignments and reminders, with one atomic
/// multi-write entry point.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn article(&self, id: ArticleId) -> Result<Article>;

    async fn workflow(&self, id: ArticleId) -> Result<ArticleWorkflow>;

    async fn active_editor_assignment(
        &self,
        article: ArticleId,
    ) -> Result<Option<EditorAssignment>>;

    async fn review_assignment(&self, id: AssignmentId) -> Result<Option<ReviewAssignment>>;

    /// All review assignments for the article, every round, oldest first.
    async fn review_assignments(&self, article: ArticleId) -> Result<Vec<ReviewAssignment>>;

    async fn revision_request(&self, id: AssignmentId) -> Result<Option<RevisionRequest>>;

    async fn revision_requests(&self, article: ArticleId) -> Result<Vec<RevisionRequest>>;

    async fn reminders_for_target(&self, target: TargetRef) -> Result<Vec<Reminder>>;

    /// Reminders attached to the article itself or to any of its
    /// assignments or revision requests.
    async fn reminders_for_article(&self, article: ArticleId) -> Result<Vec<Reminder>>;

    /// Pending reminders whose due date is on or before `today`.
    async fn due_reminders(&self, today: NaiveDate) -> Result<Vec<Reminder>>;

    /// Mark a reminder sent, re-checking that it still exists and is still
    /// pending. Returns false when the reminder was deleted, disabled or
    /// already sent in the meantime.
    async fn mark_reminder_sent(&self, id: ReminderId, now: DateTime<Utc>) -> Result<bool>;

    /// Seed an article and its workflow row.
    async fn insert_article(&self, article: Article, workflow: ArticleWorkflow) -> Result<()>;

    /// Commit a change set atomically, honoring its stale-state check.
    async fn apply(&self, change: ChangeSet) -> Result<()>;
}
