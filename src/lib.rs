#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Editorial Core
//!
//! The editorial peer-review workflow engine: tracks a manuscript from
//! submission through editor assignment, peer review, revision,
//! acceptance/rejection, typesetting and publication.
//!
//! ## Overview
//!
//! Three tightly coupled pieces make up the core:
//!
//! - a finite-state machine governing what an article may do next and who
//!   may do it ([`state_machine`]),
//! - a per-state action/attention engine that computes, on every read,
//!   which operations are permitted and whether an article needs a given
//!   user's attention ([`attention`]),
//! - a reminder engine and periodic sender that create, reschedule, cancel
//!   and dispatch time-based notifications tied to assignment due dates,
//!   with escalating recipients and clemency tolerance ([`reminders`]).
//!
//! Everything around them (file storage, email rendering, admin screens)
//! belongs to the embedding application and is reached through narrow
//! interfaces: [`storage::Repository`], [`directory::AccountDirectory`] and
//! [`notify::NotificationDispatch`].
//!
//! ## Module Organization
//!
//! - [`models`] - Articles, workflow rows, assignments and reminders
//! - [`state_machine`] - States, transition events, guards and the machine
//! - [`attention`] - Action tables, condition library and dispatch
//! - [`reminders`] - Reminder settings, engine and sender
//! - [`ops`] - Reviewer assignment lifecycle and due-date postponement
//! - [`storage`] - Repository trait, atomic change sets, in-memory backend
//! - [`roles`] - Per-article role resolution
//! - [`config`] - Engine and journal configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use editorial_core::config::JournalSettings;
//! use editorial_core::directory::InMemoryDirectory;
//! use editorial_core::state_machine::{FixedVerifier, VerificationOutcome, WorkflowMachine};
//! use editorial_core::storage::InMemoryRepository;
//! use std::sync::Arc;
//!
//! let repo = Arc::new(InMemoryRepository::new());
//! let directory = Arc::new(InMemoryDirectory::new());
//! let verifier = Arc::new(FixedVerifier(VerificationOutcome::NoAutomaticCandidate));
//! let machine = WorkflowMachine::new(
//!     repo,
//!     directory,
//!     verifier,
//!     JournalSettings::new("Journal of Examples", "JOE"),
//! );
//! ```

pub mod attention;
pub mod config;
pub mod directory;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod ops;
pub mod reminders;
pub mod roles;
pub mod state_machine;
pub mod storage;

// Re-export commonly used types at the crate root
pub use attention::AttentionEngine;
pub use config::{CoreConfig, JournalSettings};
pub use error::{CoreError, Result, StorageError};
pub use models::{
    Account, AccountId, Actor, Article, ArticleId, ArticleWorkflow, AssignmentId,
    EditorAssignment, JournalId, Reminder, ReminderCode, ReminderId, ReviewAssignment,
    RevisionKind, RevisionRequest, Role, TargetRef,
};
pub use ops::{AssignmentOps, ProductionFlags, ReviewerDecision};
pub use reminders::{ReminderEngine, ReminderSender, SenderReport};
pub use state_machine::{
    FixedVerifier, ReviewState, SubmissionVerifier, TransitionEvent, VerificationOutcome,
    WorkflowMachine,
};
pub use storage::{ChangeSet, InMemoryRepository, ReminderSelector, Repository};
