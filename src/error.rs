use crate::models::account::AccountId;
use crate::models::article::ArticleId;
use crate::state_machine::states::ReviewState;
use thiserror::Error;

/// Errors surfaced by the workflow core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested move is not declared for the article's current state.
    #[error("invalid transition: no '{event}' transition from state '{from}'")]
    InvalidTransition { from: ReviewState, event: String },

    /// A permission guard rejected the acting user. Surfaced to the caller
    /// as a user-facing rejection, logged at info level.
    #[error("permission denied for {user}: {reason}")]
    PermissionDenied { user: String, reason: String },

    /// The article moved under the caller. Re-fetch and retry.
    #[error("stale state for article {article}: expected '{expected}', found '{actual}'")]
    StaleState {
        article: ArticleId,
        expected: ReviewState,
        actual: ReviewState,
    },

    /// The account directory has no record for a referenced account.
    #[error("unknown account {0}")]
    UnknownAccount(AccountId),

    /// The journal has no editorial-office account configured.
    #[error("no editorial office account configured for the journal")]
    MissingEoAccount,

    /// The journal has no director configured.
    #[error("no director configured for the journal")]
    MissingDirector,

    #[error("notification dispatch failed: {0}")]
    NotificationDispatch(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("article {0} not found")]
    ArticleNotFound(ArticleId),

    #[error("workflow for article {0} not found")]
    WorkflowNotFound(ArticleId),

    #[error("assignment not found: {0}")]
    AssignmentNotFound(String),

    #[error("{0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
