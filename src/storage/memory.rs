//! In-memory repository for tests and single-process deployments.

use super::{ChangeSet, Repository};
use crate::error::{CoreError, Result, StorageError};
use crate::models::article::{Article, ArticleId, ArticleWorkflow};
use crate::models::assignment::{
    AssignmentId, EditorAssignment, ReviewAssignment, RevisionRequest,
};
use crate::models::reminder::{Reminder, ReminderId, TargetRef};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Hash-map backed [`Repository`]. A single commit mutex stands in for the
/// transaction a database would provide: `apply` holds it for the whole
/// change set, so readers never observe a half-applied transition.
#[derive(Default)]
pub struct InMemoryRepository {
    articles: DashMap<ArticleId, Article>,
    workflows: DashMap<ArticleId, ArticleWorkflow>,
    editor_assignments: DashMap<AssignmentId, EditorAssignment>,
    review_assignments: DashMap<AssignmentId, ReviewAssignment>,
    revision_requests: DashMap<AssignmentId, RevisionRequest>,
    reminders: DashMap<ReminderId, Reminder>,
    commit_lock: Mutex<()>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn article_targets(&self, article: ArticleId) -> Vec<TargetRef> {
        let mut targets = vec![TargetRef::Article(article)];
        for entry in self.editor_assignments.iter() {
            if entry.article_id == article {
                targets.push(TargetRef::EditorAssignment(entry.id));
            }
        }
        for entry in self.review_assignments.iter() {
            if entry.article_id == article {
                targets.push(TargetRef::ReviewAssignment(entry.id));
            }
        }
        for entry in self.revision_requests.iter() {
            if entry.article_id == article {
                targets.push(TargetRef::RevisionRequest(entry.id));
            }
        }
        targets
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn article(&self, id: ArticleId) -> Result<Article> {
        self.articles
            .get(&id)
            .map(|a| a.clone())
            .ok_or_else(|| StorageError::ArticleNotFound(id).into())
    }

    async fn workflow(&self, id: ArticleId) -> Result<ArticleWorkflow> {
        self.workflows
            .get(&id)
            .map(|w| w.clone())
            .ok_or_else(|| StorageError::WorkflowNotFound(id).into())
    }

    async fn active_editor_assignment(
        &self,
        article: ArticleId,
    ) -> Result<Option<EditorAssignment>> {
        Ok(self
            .editor_assignments
            .iter()
            .find(|entry| entry.article_id == article && entry.active)
            .map(|entry| entry.clone()))
    }

    async fn review_assignment(&self, id: AssignmentId) -> Result<Option<ReviewAssignment>> {
        Ok(self.review_assignments.get(&id).map(|a| a.clone()))
    }

    async fn review_assignments(&self, article: ArticleId) -> Result<Vec<ReviewAssignment>> {
        let mut assignments: Vec<ReviewAssignment> = self
            .review_assignments
            .iter()
            .filter(|entry| entry.article_id == article)
            .map(|entry| entry.clone())
            .collect();
        assignments.sort_by_key(|a| a.date_requested);
        Ok(assignments)
    }

    async fn revision_request(&self, id: AssignmentId) -> Result<Option<RevisionRequest>> {
        Ok(self.revision_requests.get(&id).map(|r| r.clone()))
    }

    async fn revision_requests(&self, article: ArticleId) -> Result<Vec<RevisionRequest>> {
        let mut requests: Vec<RevisionRequest> = self
            .revision_requests
            .iter()
            .filter(|entry| entry.article_id == article)
            .map(|entry| entry.clone())
            .collect();
        requests.sort_by_key(|r| r.date_requested);
        Ok(requests)
    }

    async fn reminders_for_target(&self, target: TargetRef) -> Result<Vec<Reminder>> {
        let mut reminders: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|entry| entry.target == target)
            .map(|entry| entry.clone())
            .collect();
        reminders.sort_by_key(|r| (r.date_due, r.id.0));
        Ok(reminders)
    }

    async fn reminders_for_article(&self, article: ArticleId) -> Result<Vec<Reminder>> {
        let targets = self.article_targets(article);
        let mut reminders: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|entry| targets.contains(&entry.target))
            .map(|entry| entry.clone())
            .collect();
        reminders.sort_by_key(|r| (r.date_due, r.id.0));
        Ok(reminders)
    }

    async fn due_reminders(&self, today: NaiveDate) -> Result<Vec<Reminder>> {
        let mut due: Vec<Reminder> = self
            .reminders
            .iter()
            .filter(|entry| entry.is_pending() && entry.date_due <= today)
            .map(|entry| entry.clone())
            .collect();
        due.sort_by_key(|r| (r.date_due, r.id.0));
        Ok(due)
    }

    async fn mark_reminder_sent(&self, id: ReminderId, now: DateTime<Utc>) -> Result<bool> {
        let _guard = self.commit_lock.lock();
        match self.reminders.get_mut(&id) {
            Some(mut reminder) if reminder.is_pending() => {
                reminder.date_sent = Some(now);
                Ok(true)
            }
            // Deleted, disabled or already sent under the sender's feet
            _ => Ok(false),
        }
    }

    async fn insert_article(&self, article: Article, workflow: ArticleWorkflow) -> Result<()> {
        self.workflows.insert(article.id, workflow);
        self.articles.insert(article.id, article);
        Ok(())
    }

    async fn apply(&self, change: ChangeSet) -> Result<()> {
        if change.is_empty() {
            return Ok(());
        }
        let _guard = self.commit_lock.lock();

        if let Some((article, expected)) = change.expected_state {
            let actual = self
                .workflows
                .get(&article)
                .map(|w| w.state)
                .ok_or(StorageError::WorkflowNotFound(article))?;
            if actual != expected {
                return Err(CoreError::StaleState {
                    article,
                    expected,
                    actual,
                });
            }
        }

        if let Some(workflow) = change.workflow {
            self.workflows.insert(workflow.article_id, workflow);
        }
        for assignment in change.upsert_editor_assignments {
            self.editor_assignments.insert(assignment.id, assignment);
        }
        for assignment in change.upsert_review_assignments {
            self.review_assignments.insert(assignment.id, assignment);
        }
        for request in change.upsert_revision_requests {
            self.revision_requests.insert(request.id, request);
        }
        for selector in &change.delete_reminders {
            self.reminders.retain(|_, r| !selector.matches(r));
        }
        for reminder in change.update_reminders {
            self.reminders.insert(reminder.id, reminder);
        }
        for reminder in change.create_reminders {
            self.reminders.insert(reminder.id, reminder);
        }

        Ok(())
    }
}
