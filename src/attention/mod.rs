// Action/attention engine: per-state action tables, the condition library
// and the dispatcher that computes both on every read.

pub mod actions;
pub mod conditions;
pub mod engine;

// Re-export main types for convenient access
pub use actions::{actions_for_state, ActionSpec, Allowed};
pub use engine::AttentionEngine;
