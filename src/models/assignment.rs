//! Editor, reviewer and revision assignments.

use crate::models::account::AccountId;
use crate::models::article::ArticleId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub Uuid);

impl AssignmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// (article, editor) pair. At most one active assignment per article;
/// deactivated assignments are retained for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorAssignment {
    pub id: AssignmentId,
    pub article_id: ArticleId,
    pub editor: AccountId,
    pub assigned: DateTime<Utc>,
    pub active: bool,
}

impl EditorAssignment {
    pub fn new(article_id: ArticleId, editor: AccountId, now: DateTime<Utc>) -> Self {
        Self {
            id: AssignmentId::new(),
            article_id,
            editor,
            assigned: now,
            active: true,
        }
    }
}

/// One reviewer invitation within a review round. Append-only: assignments
/// are resolved (accepted, declined, completed) but never deleted.
///
/// Invariant: at most one of `date_accepted` / `date_declined` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAssignment {
    pub id: AssignmentId,
    pub article_id: ArticleId,
    pub reviewer: AccountId,
    pub editor: AccountId,
    pub review_round: u32,
    pub date_requested: DateTime<Utc>,
    pub date_due: NaiveDate,
    pub date_accepted: Option<DateTime<Utc>>,
    pub date_declined: Option<DateTime<Utc>>,
    pub date_complete: Option<DateTime<Utc>>,
}

impl ReviewAssignment {
    pub fn new(
        article_id: ArticleId,
        reviewer: AccountId,
        editor: AccountId,
        review_round: u32,
        date_due: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AssignmentId::new(),
            article_id,
            reviewer,
            editor,
            review_round,
            date_requested: now,
            date_due,
            date_accepted: None,
            date_declined: None,
            date_complete: None,
        }
    }

    /// The reviewer still owes an answer or a report: neither declined nor
    /// completed.
    pub fn is_open(&self) -> bool {
        self.date_declined.is_none() && self.date_complete.is_none()
    }

    /// Accepted and completed. Declined assignments are never "done".
    pub fn is_done(&self) -> bool {
        self.date_accepted.is_some() && self.date_complete.is_some()
    }

    /// Invitation not yet answered either way.
    pub fn is_unanswered(&self) -> bool {
        self.date_accepted.is_none() && self.date_declined.is_none()
    }
}

/// What kind of revision the editor requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionKind {
    Major,
    Minor,
    /// Metadata-only update; does not open a new review round.
    Technical,
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Technical => "technical",
        };
        write!(f, "{label}")
    }
}

/// Request for the author to revise the manuscript, with its own due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionRequest {
    pub id: AssignmentId,
    pub article_id: ArticleId,
    pub author: AccountId,
    pub review_round: u32,
    pub kind: RevisionKind,
    pub date_requested: DateTime<Utc>,
    pub date_due: NaiveDate,
    pub date_completed: Option<DateTime<Utc>>,
}

impl RevisionRequest {
    pub fn is_pending(&self) -> bool {
        self.date_completed.is_none()
    }
}
