use crate::models::account::AccountId;
use crate::models::assignment::RevisionKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Events that can trigger article workflow transitions.
///
/// Each variant names the business action, not the resulting state; the
/// machine resolves the target state (and any reminder side effects) from
/// the current state and the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TransitionEvent {
    /// Author finalizes the submission form
    AuthorSubmitsPaper,
    /// System runs the submission checks and routes the paper
    SystemProcessesSubmission,
    /// Director puts an editor in charge
    DirectorSelectsEditor { editor: AccountId },
    /// The editor in charge declines the assignment
    EditorDeclinesAssignment,
    /// Staff clears the issues flagged by the submission checks
    AdminDeemsIssuesNotImportant,
    /// Staff rejects the paper as out of scope
    AdminDeemsPaperNotSuitable,
    /// Staff sends the paper back to the author for resubmission
    AdminRequiresResubmission,
    /// Editor files a report for the editorial office to relay
    EditorWritesEditorReport,
    /// Editor accepts the paper
    EditorAcceptsPaper,
    /// Editor rejects the paper
    EditorRejectsPaper,
    /// Editor rejects the paper as out of scope
    EditorDeemsPaperNotSuitable,
    /// Editor asks the author for a revision
    EditorRequiresRevision {
        kind: RevisionKind,
        date_due: NaiveDate,
    },
    /// Author submits the revised manuscript
    AuthorSubmitsAgain,
    /// Author withdraws the preprint
    AuthorWithdrawsPreprint,
    /// System confirms the accepted paper meets production requirements
    SystemVerifiesProductionRequirements,
    /// A typesetter takes the paper in charge
    TypesetterTakesInCharge { typesetter: AccountId },
    /// System assigns a typesetter automatically
    SystemAssignsTypesetter { typesetter: AccountId },
    /// Typesetter sends galleys to the author for proofreading
    TypesetterSubmits,
    /// Author sends corrections back to the typesetter
    AuthorSendsCorrections,
    /// Typesetter marks the paper ready for publication
    TypesetterDeemsPaperReadyForPublication,
    /// Author marks the paper ready for publication
    AuthorDeemsPaperReadyForPublication,
    /// Staff sends the paper back to the typesetter
    AdminSendsBackToTypesetter,
    /// Current editor hands the paper to a different editor
    EditorAssignsDifferentEditor { editor: AccountId },
    /// Staff publishes the paper
    AdminPublishes,
}

impl TransitionEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::AuthorSubmitsPaper => "author_submits_paper",
            Self::SystemProcessesSubmission => "system_processes_submission",
            Self::DirectorSelectsEditor { .. } => "director_selects_editor",
            Self::EditorDeclinesAssignment => "editor_declines_assignment",
            Self::AdminDeemsIssuesNotImportant => "admin_deems_issues_not_important",
            Self::AdminDeemsPaperNotSuitable => "admin_deems_paper_not_suitable",
            Self::AdminRequiresResubmission => "admin_requires_resubmission",
            Self::EditorWritesEditorReport => "editor_writes_editor_report",
            Self::EditorAcceptsPaper => "editor_accepts_paper",
            Self::EditorRejectsPaper => "editor_rejects_paper",
            Self::EditorDeemsPaperNotSuitable => "editor_deems_paper_not_suitable",
            Self::EditorRequiresRevision { .. } => "editor_requires_revision",
            Self::AuthorSubmitsAgain => "author_submits_again",
            Self::AuthorWithdrawsPreprint => "author_withdraws_preprint",
            Self::SystemVerifiesProductionRequirements => {
                "system_verifies_production_requirements"
            }
            Self::TypesetterTakesInCharge { .. } => "typesetter_takes_in_charge",
            Self::SystemAssignsTypesetter { .. } => "system_assigns_typesetter",
            Self::TypesetterSubmits => "typesetter_submits",
            Self::AuthorSendsCorrections => "author_sends_corrections",
            Self::TypesetterDeemsPaperReadyForPublication => {
                "typesetter_deems_paper_ready_for_publication"
            }
            Self::AuthorDeemsPaperReadyForPublication => {
                "author_deems_paper_ready_for_publication"
            }
            Self::AdminSendsBackToTypesetter => "admin_sends_back_to_typesetter",
            Self::EditorAssignsDifferentEditor { .. } => "editor_assigns_different_editor",
            Self::AdminPublishes => "admin_publishes",
        }
    }

    /// Check if this event may only be raised by the system, never by a user
    pub fn is_system_event(&self) -> bool {
        matches!(
            self,
            Self::SystemProcessesSubmission
                | Self::SystemVerifiesProductionRequirements
                | Self::SystemAssignsTypesetter { .. }
        )
    }
}
