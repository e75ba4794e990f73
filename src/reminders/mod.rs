// Reminder subsystem: declarative settings, row construction, due-date
// shift handling and the periodic sender.

pub mod engine;
pub mod sender;
pub mod settings;

// Re-export main types for convenient access
pub use engine::{reschedule_for_due_date_change, ReminderEngine, ReminderTarget};
pub use sender::{ReminderSender, SenderReport};
pub use settings::{default_settings, groups, PartySelector, ReminderSetting};
