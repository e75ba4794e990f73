//! Notification dispatch collaborator.

use crate::error::{CoreError, Result};
use crate::models::account::AccountId;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Outbound delivery of a rendered message. Email, in-app, whatever the
/// embedding application wires in.
#[async_trait]
pub trait NotificationDispatch: Send + Sync {
    async fn send(&self, recipient: AccountId, subject: &str, body: &str) -> Result<()>;
}

/// A delivered message, as recorded by [`RecordingDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub recipient: AccountId,
    pub subject: String,
    pub body: String,
}

/// Dispatcher that records messages instead of delivering them.
/// Can be primed to fail for specific recipients.
#[derive(Default)]
pub struct RecordingDispatcher {
    sent: Mutex<Vec<SentMessage>>,
    failing: Mutex<Vec<AccountId>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, recipient: AccountId) {
        self.failing.lock().push(recipient);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl NotificationDispatch for RecordingDispatcher {
    async fn send(&self, recipient: AccountId, subject: &str, body: &str) -> Result<()> {
        if self.failing.lock().contains(&recipient) {
            return Err(CoreError::NotificationDispatch(format!(
                "delivery to {recipient} refused"
            )));
        }
        self.sent.lock().push(SentMessage {
            recipient,
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sent_messages() {
        let dispatcher = RecordingDispatcher::new();
        let to = AccountId::new();
        dispatcher.send(to, "hello", "world").await.unwrap();
        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, to);
        assert_eq!(sent[0].subject, "hello");
    }

    #[tokio::test]
    async fn primed_failure() {
        let dispatcher = RecordingDispatcher::new();
        let to = AccountId::new();
        dispatcher.fail_for(to);
        assert!(dispatcher.send(to, "s", "b").await.is_err());
        assert!(dispatcher.sent().is_empty());
    }
}
