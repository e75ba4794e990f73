//! Reminder rows and their codes.

use crate::models::account::AccountId;
use crate::models::article::ArticleId;
use crate::models::assignment::AssignmentId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReminderId(pub Uuid);

impl ReminderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of a reminder kind. The trailing digit is the escalation tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderCode {
    ReviewerShouldEvaluateAssignment1,
    ReviewerShouldEvaluateAssignment2,
    ReviewerShouldEvaluateAssignment3,
    ReviewerShouldWriteReview1,
    ReviewerShouldWriteReview2,
    EditorShouldSelectReviewer1,
    EditorShouldSelectReviewer2,
    EditorShouldSelectReviewer3,
    EditorShouldMakeDecision1,
    EditorShouldMakeDecision2,
    EditorShouldMakeDecision3,
    AuthorShouldSubmitMajorRevision1,
    AuthorShouldSubmitMajorRevision2,
    AuthorShouldSubmitMinorRevision1,
    AuthorShouldSubmitMinorRevision2,
    AuthorShouldSubmitTechnicalRevision1,
    AuthorShouldSubmitTechnicalRevision2,
    DirectorShouldAssignEditor1,
    DirectorShouldAssignEditor2,
}

impl ReminderCode {
    pub const ALL: [ReminderCode; 19] = [
        Self::ReviewerShouldEvaluateAssignment1,
        Self::ReviewerShouldEvaluateAssignment2,
        Self::ReviewerShouldEvaluateAssignment3,
        Self::ReviewerShouldWriteReview1,
        Self::ReviewerShouldWriteReview2,
        Self::EditorShouldSelectReviewer1,
        Self::EditorShouldSelectReviewer2,
        Self::EditorShouldSelectReviewer3,
        Self::EditorShouldMakeDecision1,
        Self::EditorShouldMakeDecision2,
        Self::EditorShouldMakeDecision3,
        Self::AuthorShouldSubmitMajorRevision1,
        Self::AuthorShouldSubmitMajorRevision2,
        Self::AuthorShouldSubmitMinorRevision1,
        Self::AuthorShouldSubmitMinorRevision2,
        Self::AuthorShouldSubmitTechnicalRevision1,
        Self::AuthorShouldSubmitTechnicalRevision2,
        Self::DirectorShouldAssignEditor1,
        Self::DirectorShouldAssignEditor2,
    ];
}

impl fmt::Display for ReminderCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::ReviewerShouldEvaluateAssignment1 => "REEA1",
            Self::ReviewerShouldEvaluateAssignment2 => "REEA2",
            Self::ReviewerShouldEvaluateAssignment3 => "REEA3",
            Self::ReviewerShouldWriteReview1 => "REWR1",
            Self::ReviewerShouldWriteReview2 => "REWR2",
            Self::EditorShouldSelectReviewer1 => "EDSR1",
            Self::EditorShouldSelectReviewer2 => "EDSR2",
            Self::EditorShouldSelectReviewer3 => "EDSR3",
            Self::EditorShouldMakeDecision1 => "EDMD1",
            Self::EditorShouldMakeDecision2 => "EDMD2",
            Self::EditorShouldMakeDecision3 => "EDMD3",
            Self::AuthorShouldSubmitMajorRevision1 => "AUMJR1",
            Self::AuthorShouldSubmitMajorRevision2 => "AUMJR2",
            Self::AuthorShouldSubmitMinorRevision1 => "AUMIR1",
            Self::AuthorShouldSubmitMinorRevision2 => "AUMIR2",
            Self::AuthorShouldSubmitTechnicalRevision1 => "AUTCR1",
            Self::AuthorShouldSubmitTechnicalRevision2 => "AUTCR2",
            Self::DirectorShouldAssignEditor1 => "DIRASED1",
            Self::DirectorShouldAssignEditor2 => "DIRASED2",
        };
        write!(f, "{code}")
    }
}

impl std::str::FromStr for ReminderCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REEA1" => Ok(Self::ReviewerShouldEvaluateAssignment1),
            "REEA2" => Ok(Self::ReviewerShouldEvaluateAssignment2),
            "REEA3" => Ok(Self::ReviewerShouldEvaluateAssignment3),
            "REWR1" => Ok(Self::ReviewerShouldWriteReview1),
            "REWR2" => Ok(Self::ReviewerShouldWriteReview2),
            "EDSR1" => Ok(Self::EditorShouldSelectReviewer1),
            "EDSR2" => Ok(Self::EditorShouldSelectReviewer2),
            "EDSR3" => Ok(Self::EditorShouldSelectReviewer3),
            "EDMD1" => Ok(Self::EditorShouldMakeDecision1),
            "EDMD2" => Ok(Self::EditorShouldMakeDecision2),
            "EDMD3" => Ok(Self::EditorShouldMakeDecision3),
            "AUMJR1" => Ok(Self::AuthorShouldSubmitMajorRevision1),
            "AUMJR2" => Ok(Self::AuthorShouldSubmitMajorRevision2),
            "AUMIR1" => Ok(Self::AuthorShouldSubmitMinorRevision1),
            "AUMIR2" => Ok(Self::AuthorShouldSubmitMinorRevision2),
            "AUTCR1" => Ok(Self::AuthorShouldSubmitTechnicalRevision1),
            "AUTCR2" => Ok(Self::AuthorShouldSubmitTechnicalRevision2),
            "DIRASED1" => Ok(Self::DirectorShouldAssignEditor1),
            "DIRASED2" => Ok(Self::DirectorShouldAssignEditor2),
            _ => Err(format!("Invalid reminder code: {s}")),
        }
    }
}

/// What a reminder is attached to.
///
/// A typed union instead of a free-form reference: every target kind the
/// engine knows how to resolve a party and a due date for is enumerated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id")]
pub enum TargetRef {
    EditorAssignment(AssignmentId),
    ReviewAssignment(AssignmentId),
    RevisionRequest(AssignmentId),
    Article(ArticleId),
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EditorAssignment(id) => write!(f, "editor-assignment {id}"),
            Self::ReviewAssignment(id) => write!(f, "review-assignment {id}"),
            Self::RevisionRequest(id) => write!(f, "revision-request {id}"),
            Self::Article(id) => write!(f, "article {id}"),
        }
    }
}

/// A scheduled nudge that some due date is about to elapse (or has).
///
/// Pending iff `date_sent` is none and `disabled` is false. Subject and body
/// are rendered once, at creation time, so operators may edit them before the
/// reminder fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: ReminderId,
    pub code: ReminderCode,
    pub target: TargetRef,
    pub recipient: AccountId,
    pub actor: AccountId,
    pub date_created: DateTime<Utc>,
    pub date_due: NaiveDate,
    pub date_sent: Option<DateTime<Utc>>,
    pub disabled: bool,
    /// Tolerance window: a due-date change within this many days does not
    /// reset an already-sent reminder.
    pub clemency_days: i64,
    pub subject: String,
    pub body: String,
}

impl Reminder {
    pub fn is_pending(&self) -> bool {
        self.date_sent.is_none() && !self.disabled
    }
}
