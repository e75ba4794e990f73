// Article workflow state machine: states, transition events, permission
// guards and the machine that applies transitions together with their
// reminder side effects.

pub mod events;
pub mod guards;
pub mod machine;
pub mod states;

// Re-export main types for convenient access
pub use events::TransitionEvent;
pub use guards::{GuardContext, PermissionGuard};
pub use machine::{
    transition_declared, FixedVerifier, SubmissionVerifier, VerificationOutcome, WorkflowMachine,
};
pub use states::ReviewState;
