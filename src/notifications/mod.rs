//! Outbound email.
//!
//! Services talk to a [`Mailer`]; production wires in [`SmtpMailer`], which
//! opens one STARTTLS session per message against the configured relay.

pub mod templates;

use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::EmailSettings;

/// SMTP reply codes that mean the relay refused our credentials
const AUTH_FAILURE_CODES: [&str; 3] = ["530", "534", "535"];

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email credentials not configured")]
    NotConfigured,

    #[error("Invalid email address: {0}")]
    Address(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("SMTP authentication failed: {0}")]
    Authentication(String),

    #[error("SMTP error: {0}")]
    Transport(String),
}

impl EmailError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, EmailError::Authentication(_))
    }
}

/// A message ready to hand to a [`Mailer`]. The sender is the mailer's own account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    /// When set the message goes out as multipart/alternative
    pub html: Option<String>,
    /// Connection timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl OutgoingEmail {
    pub fn plain(
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            reply_to: None,
            subject: subject.into(),
            text: text.into(),
            html: None,
            timeout: None,
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError>;
}

/// Delivers through an SMTP relay with STARTTLS and password login
#[derive(Clone)]
pub struct SmtpMailer {
    settings: EmailSettings,
}

impl SmtpMailer {
    pub fn new(settings: EmailSettings) -> Self {
        Self { settings }
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, EmailError> {
        build_message(&self.settings.sender, email)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), EmailError> {
        let message = self.build_message(&email)?;

        let transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.smtp_server)
                .map_err(|e| EmailError::Transport(e.to_string()))?
                .port(self.settings.smtp_port)
                .credentials(Credentials::new(
                    self.settings.sender.clone(),
                    self.settings.password.clone(),
                ))
                .timeout(email.timeout)
                .build();

        match transport.send(message).await {
            Ok(response) => {
                debug!(code = %response.code(), "SMTP relay accepted message");
                Ok(())
            }
            Err(err) => {
                let err = classify_smtp_error(err);
                error!(error = %err, "SMTP delivery failed");
                Err(err)
            }
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| EmailError::Address(format!("{}: {}", address, e)))
}

fn build_message(sender: &str, email: &OutgoingEmail) -> Result<Message, EmailError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(sender)?)
        .to(parse_mailbox(&email.to)?)
        .subject(email.subject.as_str());
    if let Some(reply_to) = &email.reply_to {
        builder = builder.reply_to(parse_mailbox(reply_to)?);
    }

    let message = match &email.html {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            html.clone(),
        )),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.text.clone()),
    };
    message.map_err(|e| EmailError::Build(e.to_string()))
}

fn classify_smtp_error(err: lettre::transport::smtp::Error) -> EmailError {
    let auth_failure = err
        .status()
        .map(|code| AUTH_FAILURE_CODES.contains(&code.to_string().as_str()))
        .unwrap_or(false);
    if auth_failure {
        EmailError::Authentication(err.to_string())
    } else {
        EmailError::Transport(err.to_string())
    }
}
