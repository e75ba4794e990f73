pub mod account;
pub mod article;
pub mod assignment;
pub mod reminder;

// Re-export core models for easy access
pub use account::{Account, AccountId, Actor, Role};
pub use article::{Article, ArticleId, ArticleWorkflow, GalleysStatus, JournalId};
pub use assignment::{
    AssignmentId, EditorAssignment, ReviewAssignment, RevisionKind, RevisionRequest,
};
pub use reminder::{Reminder, ReminderCode, ReminderId, TargetRef};
