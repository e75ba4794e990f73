//! Periodic dispatch of due reminders.

use crate::config::CoreConfig;
use crate::error::Result;
use crate::notify::NotificationDispatch;
use crate::storage::Repository;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Aggregate outcome of one sender run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderReport {
    pub sent: usize,
    pub total: usize,
}

/// Sends due, unsent, non-disabled reminders.
///
/// Driven by an external scheduler (daily is standard). No retry logic:
/// a reminder whose delivery fails stays pending and is reattempted on the
/// next run.
pub struct ReminderSender {
    repo: Arc<dyn Repository>,
    dispatch: Arc<dyn NotificationDispatch>,
    config: CoreConfig,
}

impl ReminderSender {
    pub fn new(
        repo: Arc<dyn Repository>,
        dispatch: Arc<dyn NotificationDispatch>,
        config: CoreConfig,
    ) -> Self {
        Self {
            repo,
            dispatch,
            config,
        }
    }

    /// One batch run. Failures are per-item: one slow or refusing recipient
    /// never blocks the rest of the batch.
    pub async fn run_due_reminders(&self, now: DateTime<Utc>) -> Result<SenderReport> {
        let due = self.repo.due_reminders(now.date_naive()).await?;
        let total = due.len();
        let mut sent = 0;

        let per_item_timeout = Duration::from_millis(self.config.dispatch_timeout_ms);
        for reminder in due {
            let delivery = tokio::time::timeout(
                per_item_timeout,
                self.dispatch
                    .send(reminder.recipient, &reminder.subject, &reminder.body),
            )
            .await;

            match delivery {
                Ok(Ok(())) => {
                    // The reminder may have been deleted or resolved while
                    // we were dispatching; a vanished row is a silent skip.
                    if self.repo.mark_reminder_sent(reminder.id, now).await? {
                        sent += 1;
                    } else {
                        warn!(
                            reminder = %reminder.id,
                            code = %reminder.code,
                            "reminder resolved during dispatch, not counted as sent"
                        );
                    }
                }
                Ok(Err(err)) => {
                    warn!(
                        reminder = %reminder.id,
                        code = %reminder.code,
                        recipient = %reminder.recipient,
                        error = %err,
                        "reminder delivery failed, will retry on next run"
                    );
                }
                Err(_) => {
                    warn!(
                        reminder = %reminder.id,
                        code = %reminder.code,
                        recipient = %reminder.recipient,
                        timeout_ms = self.config.dispatch_timeout_ms,
                        "reminder delivery timed out, will retry on next run"
                    );
                }
            }
        }

        info!(sent, total, "reminder batch complete");
        Ok(SenderReport { sent, total })
    }
}
