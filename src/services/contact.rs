use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::{
    common::{field, json_text, require_object},
    config::AppConfig,
    errors::ServiceError,
    notifications::{templates, EmailError, Mailer, OutgoingEmail},
};

pub const DEFAULT_SUBJECT: &str = "New Message from FarmLink";
pub const DELIVERY_FAILED: &str = "Failed to send email. Please try again later.";

/// A validated contact-form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    pub fn from_payload(payload: &Value) -> Result<Self, ServiceError> {
        let body = require_object(payload)?;
        let trimmed = |name: &str| {
            field(body, name)
                .and_then(json_text)
                .map(|text| text.trim().to_string())
                .unwrap_or_default()
        };

        let name = trimmed("name");
        let email = trimmed("email");
        let message = trimmed("message");
        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Please fill all required fields".to_string(),
            ));
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(ServiceError::InvalidInput(
                "Please enter a valid email address".to_string(),
            ));
        }

        let subject = match trimmed("subject") {
            s if s.is_empty() => DEFAULT_SUBJECT.to_string(),
            s => s,
        };

        Ok(Self {
            name,
            email,
            subject,
            message,
        })
    }
}

/// Routes contact-form submissions and SMTP smoke tests to the mailer.
///
/// `mailer` is `None` when no SMTP credentials are configured.
#[derive(Clone)]
pub struct ContactNotifier {
    mailer: Option<Arc<dyn Mailer>>,
    admin_email: Option<String>,
    deliver_contact: bool,
    timeout: Duration,
}

impl ContactNotifier {
    pub fn new(
        mailer: Option<Arc<dyn Mailer>>,
        admin_email: Option<String>,
        deliver_contact: bool,
        timeout: Duration,
    ) -> Self {
        Self {
            mailer,
            admin_email,
            deliver_contact,
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self::new(
            mailer,
            config.admin_email().map(str::to_string),
            config.contact_email_delivery,
            config.smtp_timeout(),
        )
    }

    /// Accepts a contact-form payload.
    ///
    /// With delivery disabled the submission is only logged. Otherwise the
    /// admin notification must go out; the confirmation to the visitor is
    /// best effort.
    #[instrument(skip(self, payload))]
    pub async fn submit(&self, payload: &Value) -> Result<ContactMessage, ServiceError> {
        let contact = ContactMessage::from_payload(payload)?;

        if !self.deliver_contact {
            info!(
                name = %contact.name,
                email = %contact.email,
                subject = %contact.subject,
                message = %contact.message,
                "Contact message received; email delivery disabled"
            );
            return Ok(contact);
        }

        if let Err(err) = self.send_contact_email(&contact).await {
            if err.is_authentication() {
                error!(error = %err, "SMTP authentication error, check email credentials");
            } else {
                error!(error = %err, "Error sending contact email");
            }
            return Err(ServiceError::EmailDelivery(DELIVERY_FAILED.to_string()));
        }

        if let Err(err) = self.send_confirmation_email(&contact).await {
            warn!(error = %err, email = %contact.email, "Error sending confirmation email");
        }

        Ok(contact)
    }

    /// Sends the submission to the admin address, replying to the visitor.
    pub async fn send_contact_email(&self, contact: &ContactMessage) -> Result<(), EmailError> {
        let (mailer, admin) = self.account()?;
        let email = OutgoingEmail::plain(
            admin,
            templates::contact_subject(&contact.subject),
            templates::contact_text(
                &contact.name,
                &contact.email,
                &contact.subject,
                &contact.message,
                Utc::now(),
            ),
        )
        .with_html(templates::contact_html(
            &contact.name,
            &contact.email,
            &contact.subject,
            &contact.message,
        ))
        .with_reply_to(contact.email.as_str())
        .with_timeout(self.timeout);

        mailer.send(email).await?;
        info!(to = %admin, "Contact email sent");
        Ok(())
    }

    /// Thanks the visitor. No timeout is applied.
    pub async fn send_confirmation_email(
        &self,
        contact: &ContactMessage,
    ) -> Result<(), EmailError> {
        let (mailer, _) = self.account()?;
        let email = OutgoingEmail::plain(
            contact.email.as_str(),
            templates::CONFIRMATION_SUBJECT,
            templates::confirmation_text(&contact.name),
        )
        .with_html(templates::confirmation_html(&contact.name));

        mailer.send(email).await?;
        info!(to = %contact.email, "Confirmation email sent");
        Ok(())
    }

    /// Plain-text smoke test to the admin address
    #[instrument(skip(self))]
    pub async fn send_test_email(&self) -> Result<(), EmailError> {
        let (mailer, admin) = self.account()?;
        let email = OutgoingEmail::plain(admin, templates::TEST_SUBJECT, templates::TEST_BODY)
            .with_timeout(self.timeout);
        mailer.send(email).await?;
        info!(to = %admin, "Test email sent");
        Ok(())
    }

    fn account(&self) -> Result<(&Arc<dyn Mailer>, &str), EmailError> {
        match (&self.mailer, &self.admin_email) {
            (Some(mailer), Some(admin)) => Ok((mailer, admin.as_str())),
            _ => Err(EmailError::NotConfigured),
        }
    }
}
