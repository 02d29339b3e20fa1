use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use quill_core::ports::{MailError, MailMessage, Mailer};

use super::mask_email;

/// Mailer that keeps messages in memory instead of sending them.
///
/// Used when no SMTP relay is configured, and by tests to inspect what was sent.
#[derive(Clone, Default)]
pub struct InMemoryMailer {
    outbox: Arc<Mutex<Vec<MailMessage>>>,
    fail: bool,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Messages accepted so far, oldest first.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Transport("in-memory mailer is set to fail".to_string()));
        }

        let recipients: Vec<String> = message.to.iter().map(|to| mask_email(to)).collect();
        tracing::info!(
            to = ?recipients,
            subject = %message.subject,
            "Mail captured in memory"
        );

        self.outbox
            .lock()
            .map_err(|_| MailError::Transport("outbox lock poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> MailMessage {
        MailMessage::new(
            "Hello",
            "Body",
            "blog@localhost",
            vec!["reader@example.com".to_string()],
        )
    }

    #[tokio::test]
    async fn test_send_captures_message() {
        let mailer = InMemoryMailer::new();
        mailer.send(&message()).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Hello");
    }

    #[tokio::test]
    async fn test_clones_share_outbox() {
        let mailer = InMemoryMailer::new();
        mailer.clone().send(&message()).await.unwrap();
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_mailer() {
        let mailer = InMemoryMailer::failing();
        let result = mailer.send(&message()).await;

        assert!(matches!(result, Err(MailError::Transport(_))));
        assert!(mailer.sent().is_empty());
    }
}
