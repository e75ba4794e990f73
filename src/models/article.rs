//! Articles and their workflow row.

use crate::models::account::AccountId;
use crate::state_machine::states::ReviewState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArticleId(pub Uuid);

impl ArticleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArticleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JournalId(pub Uuid);

impl JournalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JournalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JournalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The manuscript record. Owned externally; the core reads it to resolve
/// authorship and to render reminder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub journal_id: JournalId,
    pub title: String,
    /// Section name as shown to users (e.g. "article", "review").
    pub section_name: String,
    pub authors: Vec<AccountId>,
    pub corresponding_author: AccountId,
}

impl Article {
    /// All accounts with authorship on the article, corresponding author included.
    pub fn is_author(&self, user: AccountId) -> bool {
        self.corresponding_author == user || self.authors.contains(&user)
    }
}

/// Outcome of testing the latest galleys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleysStatus {
    NotTested,
    TestFailed,
    TestSucceeded,
}

impl Default for GalleysStatus {
    fn default() -> Self {
        Self::NotTested
    }
}

/// Per-manuscript workflow state. One row per article, created at submission
/// start and mutated exclusively through the state machine and the
/// assignment-level operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleWorkflow {
    pub article_id: ArticleId,
    pub journal_id: JournalId,
    pub state: ReviewState,
    /// Updated on every state write.
    pub latest_state_change: DateTime<Utc>,
    pub eo_in_charge: Option<AccountId>,
    /// Numbered cycle of reviewer assignments; a new round starts when a
    /// revision is requested.
    pub current_review_round: u32,
    // Production-readiness flags, toggled during typesetting.
    pub production_flag_no_queries: bool,
    pub production_flag_galleys_ok: GalleysStatus,
    pub production_flag_no_checks_needed: bool,
}

impl ArticleWorkflow {
    /// A fresh workflow for a just-started submission.
    pub fn new(article_id: ArticleId, journal_id: JournalId, now: DateTime<Utc>) -> Self {
        Self {
            article_id,
            journal_id,
            state: ReviewState::IncompleteSubmission,
            latest_state_change: now,
            eo_in_charge: None,
            current_review_round: 1,
            production_flag_no_queries: false,
            production_flag_galleys_ok: GalleysStatus::NotTested,
            production_flag_no_checks_needed: true,
        }
    }

    /// Whether the article may move to `ReadyForPublication`: galleys tested
    /// successfully, no special checks outstanding, no author queries left.
    pub fn can_be_set_rfp(&self) -> bool {
        self.production_flag_galleys_ok == GalleysStatus::TestSucceeded
            && self.production_flag_no_checks_needed
            && self.production_flag_no_queries
    }
}
