use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, MessageBuilder};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use quill_core::ports::{MailError, MailMessage, Mailer};

use super::{SmtpConfig, mask_email};

/// Mailer that relays through an SMTP server over TLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| MailError::Transport(format!("Invalid SMTP host: {e}")))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!(host = %config.host, port = config.port, "SMTP mailer configured");

        Ok(Self {
            transport: builder.build(),
        })
    }
}

fn mailbox(field: &'static str, address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|e| MailError::Address {
        field,
        reason: format!("{e}"),
    })
}

/// Convert a port message into a plain-text lettre message.
fn build_message(message: &MailMessage) -> Result<Message, MailError> {
    let mut builder: MessageBuilder = Message::builder()
        .from(mailbox("from", &message.from)?)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_PLAIN);

    for to in &message.to {
        builder = builder.to(mailbox("to", to)?);
    }

    if let Some(reply_to) = &message.reply_to {
        builder = builder.reply_to(mailbox("reply_to", reply_to)?);
    }

    builder
        .body(message.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let email = build_message(message)?;

        self.transport.send(email).await.map_err(|e| {
            tracing::error!(error = %e, "SMTP send failed");
            MailError::Transport(e.to_string())
        })?;

        let recipients: Vec<String> = message.to.iter().map(|to| mask_email(to)).collect();
        tracing::info!(to = ?recipients, "Mail sent");
        Ok(())
    }
}
