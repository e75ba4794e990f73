//! Reminder creation and due-date shift handling.

use super::settings::{default_settings, PartySelector, ReminderSetting};
use crate::config::JournalSettings;
use crate::directory::{resolve_director, AccountDirectory};
use crate::error::Result;
use crate::models::account::AccountId;
use crate::models::article::Article;
use crate::models::assignment::{EditorAssignment, ReviewAssignment, RevisionRequest};
use crate::models::reminder::{Reminder, ReminderCode, ReminderId, TargetRef};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// A concrete object a reminder can be attached to, with everything needed
/// to resolve parties and the base due date. Each variant knows its own
/// capabilities; selectors that do not apply are a configuration problem,
/// not a panic.
pub enum ReminderTarget<'a> {
    EditorAssignment {
        assignment: &'a EditorAssignment,
        article: &'a Article,
        /// Editor assignments carry no due date of their own; the caller
        /// derives one from journal settings.
        date_due: NaiveDate,
    },
    ReviewAssignment {
        assignment: &'a ReviewAssignment,
        article: &'a Article,
    },
    RevisionRequest {
        request: &'a RevisionRequest,
        article: &'a Article,
        /// The editor who requested the revision.
        editor: AccountId,
    },
    Article {
        article: &'a Article,
        date_due: NaiveDate,
    },
}

impl ReminderTarget<'_> {
    pub fn target_ref(&self) -> TargetRef {
        match self {
            Self::EditorAssignment { assignment, .. } => {
                TargetRef::EditorAssignment(assignment.id)
            }
            Self::ReviewAssignment { assignment, .. } => {
                TargetRef::ReviewAssignment(assignment.id)
            }
            Self::RevisionRequest { request, .. } => TargetRef::RevisionRequest(request.id),
            Self::Article { article, .. } => TargetRef::Article(article.id),
        }
    }

    pub fn article(&self) -> &Article {
        match self {
            Self::EditorAssignment { article, .. }
            | Self::ReviewAssignment { article, .. }
            | Self::RevisionRequest { article, .. }
            | Self::Article { article, .. } => article,
        }
    }

    /// The target's own due date, the base that `days_after` offsets.
    pub fn date_due(&self) -> NaiveDate {
        match self {
            Self::EditorAssignment { date_due, .. } | Self::Article { date_due, .. } => {
                *date_due
            }
            Self::ReviewAssignment { assignment, .. } => assignment.date_due,
            Self::RevisionRequest { request, .. } => request.date_due,
        }
    }

    /// Resolve a party selector against this target. None when the selector
    /// does not apply to this target kind.
    async fn party(
        &self,
        selector: PartySelector,
        directory: &dyn AccountDirectory,
    ) -> Result<Option<AccountId>> {
        let account = match selector {
            PartySelector::Editor => match self {
                Self::EditorAssignment { assignment, .. } => Some(assignment.editor),
                Self::ReviewAssignment { assignment, .. } => Some(assignment.editor),
                Self::RevisionRequest { editor, .. } => Some(*editor),
                Self::Article { .. } => None,
            },
            PartySelector::Reviewer => match self {
                Self::ReviewAssignment { assignment, .. } => Some(assignment.reviewer),
                _ => None,
            },
            PartySelector::Author => Some(self.article().corresponding_author),
            PartySelector::Eo => Some(directory.eo_account().await?),
            PartySelector::Director => Some(resolve_director(directory).await?),
        };
        Ok(account)
    }
}

/// Builds reminder rows from declarative settings.
pub struct ReminderEngine {
    directory: Arc<dyn AccountDirectory>,
    defaults: HashMap<ReminderCode, ReminderSetting>,
}

impl ReminderEngine {
    pub fn new(directory: Arc<dyn AccountDirectory>) -> Self {
        Self {
            directory,
            defaults: default_settings(),
        }
    }

    fn setting<'s>(
        &'s self,
        journal: &'s JournalSettings,
        code: ReminderCode,
    ) -> Option<&'s ReminderSetting> {
        journal
            .reminder_overrides
            .get(&code)
            .or_else(|| self.defaults.get(&code))
    }

    /// Build one reminder. Returns None (and logs) when the code has no
    /// setting or a party cannot be resolved: a broken reminder
    /// configuration must never block the triggering business operation.
    pub async fn create_reminder(
        &self,
        journal: &JournalSettings,
        target: &ReminderTarget<'_>,
        code: ReminderCode,
        now: DateTime<Utc>,
    ) -> Result<Option<Reminder>> {
        let Some(setting) = self.setting(journal, code) else {
            warn!(code = %code, target = %target.target_ref(), "no reminder setting, skipping");
            return Ok(None);
        };

        let Some(actor) = target.party(setting.actor, self.directory.as_ref()).await? else {
            warn!(code = %code, target = %target.target_ref(), "actor selector does not apply, skipping");
            return Ok(None);
        };
        let Some(recipient) = target
            .party(setting.recipient, self.directory.as_ref())
            .await?
        else {
            warn!(code = %code, target = %target.target_ref(), "recipient selector does not apply, skipping");
            return Ok(None);
        };

        let date_due = target.date_due() + Duration::days(setting.days_after);
        let recipient_account = self.directory.account(recipient).await?;
        let actor_account = self.directory.account(actor).await?;
        let article = target.article();

        let mut context = HashMap::new();
        context.insert("article_title", article.title.clone());
        context.insert("section_name", article.section_name.clone());
        context.insert("journal_name", journal.journal_name.clone());
        context.insert("journal_code", journal.journal_code.clone());
        context.insert("recipient_name", recipient_account.full_name);
        context.insert("actor_name", actor_account.full_name);
        context.insert("date_due", date_due.format("%Y-%m-%d").to_string());

        Ok(Some(Reminder {
            id: ReminderId::new(),
            code,
            target: target.target_ref(),
            recipient,
            actor,
            date_created: now,
            date_due,
            date_sent: None,
            disabled: false,
            clemency_days: setting.clemency_days,
            subject: render(&setting.subject, &context),
            body: render(&setting.body, &context),
        }))
    }

    /// Build the whole escalation group for a target, skipping entries
    /// without usable configuration.
    pub async fn create_group(
        &self,
        journal: &JournalSettings,
        target: &ReminderTarget<'_>,
        codes: &[ReminderCode],
        now: DateTime<Utc>,
    ) -> Result<Vec<Reminder>> {
        let mut reminders = Vec::with_capacity(codes.len());
        for &code in codes {
            if let Some(reminder) = self.create_reminder(journal, target, code, now).await? {
                reminders.push(reminder);
            }
        }
        Ok(reminders)
    }
}

/// Shift reminders for a target whose own due date is changing from
/// `old_due` to `new_due`. Returns only the reminders that need updating;
/// must run before the new due date is persisted.
///
/// A sent reminder within its clemency window stays sent and untouched.
/// Beyond clemency it is shifted and un-sent so it fires again. Unsent
/// reminders shift regardless.
pub fn reschedule_for_due_date_change(
    reminders: Vec<Reminder>,
    old_due: NaiveDate,
    new_due: NaiveDate,
) -> Vec<Reminder> {
    let delta = (new_due - old_due).num_days();
    if delta == 0 {
        return Vec::new();
    }

    reminders
        .into_iter()
        .filter(|r| !r.disabled)
        .filter_map(|mut reminder| {
            let beyond_clemency = delta.abs() > reminder.clemency_days;
            match (reminder.date_sent.is_some(), beyond_clemency) {
                (true, false) => None,
                (sent, _) => {
                    reminder.date_due += Duration::days(delta);
                    if sent {
                        reminder.date_sent = None;
                    }
                    Some(reminder)
                }
            }
        })
        .collect()
}

fn render(template: &str, context: &HashMap<&str, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in context {
        out = out.replace(&format!("{{{{ {key} }}}}"), value);
    }
    out
}
