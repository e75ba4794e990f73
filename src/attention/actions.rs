//! Per-state action tables.
//!
//! Each state declares an ordered list of operations a user may trigger.
//! Order is significant: UIs render the first permitted action as primary,
//! so the filtered list must preserve declaration order.

use crate::models::account::Role;
use crate::models::article::ArticleWorkflow;
use crate::state_machine::states::ReviewState;

/// Who may see an action, plus any extra gate beyond the role.
#[derive(Debug, Clone, Copy)]
pub enum Allowed {
    Roles(&'static [Role]),
    /// Role check plus the production-readiness flags.
    RolesWithRfp(&'static [Role]),
}

/// One operation a user may trigger from a state.
#[derive(Debug, Clone, Copy)]
pub struct ActionSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub allowed: Allowed,
}

impl ActionSpec {
    pub fn permitted(&self, workflow: &ArticleWorkflow, role: Role) -> bool {
        match self.allowed {
            Allowed::Roles(roles) => roles.contains(&role),
            Allowed::RolesWithRfp(roles) => roles.contains(&role) && workflow.can_be_set_rfp(),
        }
    }
}

const STAFF: &[Role] = &[Role::Eo, Role::Director];
const EDITOR: &[Role] = &[Role::Editor];
const EDITOR_OR_STAFF: &[Role] = &[Role::Editor, Role::Eo, Role::Director];
const AUTHOR: &[Role] = &[Role::Author];
const TYPESETTER: &[Role] = &[Role::Typesetter];

/// The declared action list for a state, in display order.
pub fn actions_for_state(state: ReviewState) -> &'static [ActionSpec] {
    use ReviewState::*;
    match state {
        IncompleteSubmission => &[ActionSpec {
            name: "submit_paper",
            label: "Complete the submission",
            allowed: Allowed::Roles(AUTHOR),
        }],
        Submitted => &[],
        EditorToBeSelected => &[
            ActionSpec {
                name: "select_editor",
                label: "Assign an editor",
                allowed: Allowed::Roles(STAFF),
            },
            ActionSpec {
                name: "withdraw_preprint",
                label: "Withdraw the preprint",
                allowed: Allowed::Roles(AUTHOR),
            },
        ],
        EditorSelected => &[
            ActionSpec {
                name: "assign_reviewer",
                label: "Select a reviewer",
                allowed: Allowed::Roles(EDITOR),
            },
            ActionSpec {
                name: "make_decision",
                label: "Write the decision",
                allowed: Allowed::Roles(EDITOR),
            },
            ActionSpec {
                name: "postpone_reviewer_due_date",
                label: "Postpone a review due date",
                allowed: Allowed::Roles(EDITOR),
            },
            ActionSpec {
                name: "assign_different_editor",
                label: "Assign a different editor",
                allowed: Allowed::Roles(EDITOR_OR_STAFF),
            },
            ActionSpec {
                name: "withdraw_preprint",
                label: "Withdraw the preprint",
                allowed: Allowed::Roles(AUTHOR),
            },
        ],
        PaperMightHaveIssues => &[
            ActionSpec {
                name: "deem_issues_not_important",
                label: "Queue the submission anyway",
                allowed: Allowed::Roles(STAFF),
            },
            ActionSpec {
                name: "deem_paper_not_suitable",
                label: "Mark as not suitable",
                allowed: Allowed::Roles(STAFF),
            },
            ActionSpec {
                name: "require_resubmission",
                label: "Send back to the author",
                allowed: Allowed::Roles(STAFF),
            },
        ],
        PaperHasEditorReport => &[
            ActionSpec {
                name: "accept_paper",
                label: "Accept",
                allowed: Allowed::Roles(EDITOR_OR_STAFF),
            },
            ActionSpec {
                name: "reject_paper",
                label: "Reject",
                allowed: Allowed::Roles(EDITOR_OR_STAFF),
            },
            ActionSpec {
                name: "require_revision",
                label: "Request a revision",
                allowed: Allowed::Roles(EDITOR_OR_STAFF),
            },
        ],
        ToBeRevised => &[
            ActionSpec {
                name: "submit_revision",
                label: "Submit the revision",
                allowed: Allowed::Roles(AUTHOR),
            },
            ActionSpec {
                name: "postpone_revision_due_date",
                label: "Postpone the revision due date",
                allowed: Allowed::Roles(EDITOR),
            },
            ActionSpec {
                name: "withdraw_preprint",
                label: "Withdraw the preprint",
                allowed: Allowed::Roles(AUTHOR),
            },
        ],
        Accepted => &[],
        ReadyForTypesetter => &[ActionSpec {
            name: "take_in_charge",
            label: "Take in charge",
            allowed: Allowed::Roles(TYPESETTER),
        }],
        TypesetterSelected => &[
            ActionSpec {
                name: "submit_galleys",
                label: "Send galleys to the author",
                allowed: Allowed::Roles(TYPESETTER),
            },
            ActionSpec {
                name: "ready_for_publication",
                label: "Mark ready for publication",
                allowed: Allowed::RolesWithRfp(TYPESETTER),
            },
        ],
        Proofreading => &[
            ActionSpec {
                name: "send_corrections",
                label: "Send corrections",
                allowed: Allowed::Roles(AUTHOR),
            },
            ActionSpec {
                name: "ready_for_publication",
                label: "Mark ready for publication",
                allowed: Allowed::RolesWithRfp(AUTHOR),
            },
        ],
        ReadyForPublication => &[
            ActionSpec {
                name: "publish",
                label: "Publish",
                allowed: Allowed::Roles(STAFF),
            },
            ActionSpec {
                name: "send_back_to_typesetter",
                label: "Send back to the typesetter",
                allowed: Allowed::Roles(STAFF),
            },
        ],
        Rejected | NotSuitable | Withdrawn | Published => &[],
    }
}
