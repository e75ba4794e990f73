//! Runtime configuration for the workflow core.
//!
//! Engine-wide settings come from the environment (prefix `EDITORIAL_`,
//! e.g. `EDITORIAL_DISPATCH_TIMEOUT_MS=5000`); journal-specific settings are
//! provided by the embedding application per call.

use crate::models::reminder::ReminderCode;
use crate::reminders::settings::ReminderSetting;
use serde::Deserialize;
use std::collections::HashMap;

/// Engine-wide settings, independent of any journal.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Per-item timeout for notification dispatch in the reminder sender.
    pub dispatch_timeout_ms: u64,
    /// Days an unanswered reviewer invitation may sit before it counts as late.
    pub invitation_grace_days: i64,
    /// Days after a sent last-tier reminder before the article is flagged to
    /// the editorial office.
    pub reminder_late_after_days: i64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            dispatch_timeout_ms: 10_000,
            invitation_grace_days: 4,
            reminder_late_after_days: 3,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("EDITORIAL").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

/// Journal-specific knobs consulted by the state machine and the reminder
/// engine. One instance per journal, supplied by the embedding application.
#[derive(Debug, Clone)]
pub struct JournalSettings {
    pub journal_name: String,
    pub journal_code: String,
    /// Days an editor gets to pick the first reviewer of a round.
    pub editor_assign_reviewer_days: i64,
    /// Days an editor gets to write a decision once reviews are in.
    pub editor_make_decision_days: i64,
    /// Per-code overrides shadowing the default reminder settings.
    pub reminder_overrides: HashMap<ReminderCode, ReminderSetting>,
}

impl JournalSettings {
    pub fn new(journal_name: impl Into<String>, journal_code: impl Into<String>) -> Self {
        Self {
            journal_name: journal_name.into(),
            journal_code: journal_code.into(),
            editor_assign_reviewer_days: 7,
            editor_make_decision_days: 7,
            reminder_overrides: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.invitation_grace_days, 4);
        assert_eq!(cfg.dispatch_timeout_ms, 10_000);
    }

    #[test]
    fn journal_settings_defaults() {
        let js = JournalSettings::new("Journal of Tests", "JOT");
        assert_eq!(js.editor_assign_reviewer_days, 7);
        assert_eq!(js.editor_make_decision_days, 7);
        assert!(js.reminder_overrides.is_empty());
    }
}
