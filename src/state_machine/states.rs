use serde::{Deserialize, Serialize};
use std::fmt;

/// Article workflow state definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Author is still filling in the submission
    IncompleteSubmission,
    /// Submission complete, waiting for system checks
    Submitted,
    /// No automatic editor candidate, the director must pick one
    EditorToBeSelected,
    /// An editor is in charge, peer review may proceed
    EditorSelected,
    /// System checks flagged the submission for staff triage
    PaperMightHaveIssues,
    /// Editor wrote a report, staff relays the decision
    PaperHasEditorReport,
    /// Author must submit a revision
    ToBeRevised,
    /// Accepted for publication, production checks pending
    Accepted,
    /// Rejected after review
    Rejected,
    /// Deemed out of scope for the journal
    NotSuitable,
    /// Withdrawn by the author
    Withdrawn,
    /// Production requirements verified, awaiting a typesetter
    ReadyForTypesetter,
    /// A typesetter took the paper in charge
    TypesetterSelected,
    /// Author is checking the typeset galleys
    Proofreading,
    /// All production checks passed
    ReadyForPublication,
    /// Published
    Published,
}

impl ReviewState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::NotSuitable | Self::Withdrawn | Self::Published
        )
    }

    /// Check if the article is still under peer review (pre-decision)
    pub fn is_under_review(&self) -> bool {
        matches!(
            self,
            Self::EditorToBeSelected
                | Self::EditorSelected
                | Self::PaperMightHaveIssues
                | Self::PaperHasEditorReport
                | Self::ToBeRevised
        )
    }

    /// Check if the article is in the production pipeline
    pub fn is_in_production(&self) -> bool {
        matches!(
            self,
            Self::Accepted
                | Self::ReadyForTypesetter
                | Self::TypesetterSelected
                | Self::Proofreading
                | Self::ReadyForPublication
        )
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncompleteSubmission => write!(f, "incomplete_submission"),
            Self::Submitted => write!(f, "submitted"),
            Self::EditorToBeSelected => write!(f, "editor_to_be_selected"),
            Self::EditorSelected => write!(f, "editor_selected"),
            Self::PaperMightHaveIssues => write!(f, "paper_might_have_issues"),
            Self::PaperHasEditorReport => write!(f, "paper_has_editor_report"),
            Self::ToBeRevised => write!(f, "to_be_revised"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
            Self::NotSuitable => write!(f, "not_suitable"),
            Self::Withdrawn => write!(f, "withdrawn"),
            Self::ReadyForTypesetter => write!(f, "ready_for_typesetter"),
            Self::TypesetterSelected => write!(f, "typesetter_selected"),
            Self::Proofreading => write!(f, "proofreading"),
            Self::ReadyForPublication => write!(f, "ready_for_publication"),
            Self::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for ReviewState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete_submission" => Ok(Self::IncompleteSubmission),
            "submitted" => Ok(Self::Submitted),
            "editor_to_be_selected" => Ok(Self::EditorToBeSelected),
            "editor_selected" => Ok(Self::EditorSelected),
            "paper_might_have_issues" => Ok(Self::PaperMightHaveIssues),
            "paper_has_editor_report" => Ok(Self::PaperHasEditorReport),
            "to_be_revised" => Ok(Self::ToBeRevised),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "not_suitable" => Ok(Self::NotSuitable),
            "withdrawn" => Ok(Self::Withdrawn),
            "ready_for_typesetter" => Ok(Self::ReadyForTypesetter),
            "typesetter_selected" => Ok(Self::TypesetterSelected),
            "proofreading" => Ok(Self::Proofreading),
            "ready_for_publication" => Ok(Self::ReadyForPublication),
            "published" => Ok(Self::Published),
            _ => Err(format!("Invalid review state: {s}")),
        }
    }
}

/// Default state for new submissions
impl Default for ReviewState {
    fn default() -> Self {
        Self::IncompleteSubmission
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ReviewState::Rejected.is_terminal());
        assert!(ReviewState::NotSuitable.is_terminal());
        assert!(ReviewState::Withdrawn.is_terminal());
        assert!(ReviewState::Published.is_terminal());
        assert!(!ReviewState::EditorSelected.is_terminal());
        assert!(!ReviewState::ReadyForPublication.is_terminal());
    }

    #[test]
    fn test_phase_predicates() {
        assert!(ReviewState::EditorSelected.is_under_review());
        assert!(!ReviewState::Accepted.is_under_review());
        assert!(ReviewState::Proofreading.is_in_production());
        assert!(!ReviewState::Submitted.is_in_production());
    }

    #[test]
    fn test_state_string_conversion() {
        assert_eq!(ReviewState::EditorSelected.to_string(), "editor_selected");
        assert_eq!(
            "to_be_revised".parse::<ReviewState>().unwrap(),
            ReviewState::ToBeRevised
        );
        assert!("bogus".parse::<ReviewState>().is_err());
    }

    #[test]
    fn test_state_serde() {
        let state = ReviewState::PaperMightHaveIssues;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"paper_might_have_issues\"");

        let parsed: ReviewState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
