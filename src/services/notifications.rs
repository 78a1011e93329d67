//! Borrow confirmation notifications.
//!
//! The borrow flow only knows the [`BorrowNotifier`] port; delivery failure
//! is the caller's to log, never to roll back on. The SMTP implementation
//! follows the library's mail settings; deployments without SMTP get the
//! logging implementation.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

/// Port for the borrow confirmation sent after a successful transaction
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BorrowNotifier: Send + Sync {
    /// Confirm a borrow to the member. Invoked exactly once per successful
    /// transaction.
    async fn send_borrow_confirmation(
        &self,
        user_name: &str,
        user_email: &str,
        book_name: &str,
        return_date_display: &str,
    ) -> AppResult<()>;
}

/// SMTP-backed notifier
#[derive(Clone)]
pub struct EmailNotifier {
    config: EmailConfig,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Kanisa Library");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            mailer_builder.credentials(Credentials::new(username.clone(), password.clone()))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl BorrowNotifier for EmailNotifier {
    async fn send_borrow_confirmation(
        &self,
        user_name: &str,
        user_email: &str,
        book_name: &str,
        return_date_display: &str,
    ) -> AppResult<()> {
        let subject = "Borrow confirmed";
        let body = format!(
            r#"
Dear {user_name},

You have borrowed "{book_name}".

Please return it by {return_date_display}.
"#,
        );
        self.send_email(user_email, subject, &body)
    }
}

/// Notifier used when SMTP is not configured: the confirmation lands in the
/// server log instead of a mailbox.
#[derive(Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl BorrowNotifier for LogNotifier {
    async fn send_borrow_confirmation(
        &self,
        user_name: &str,
        user_email: &str,
        book_name: &str,
        return_date_display: &str,
    ) -> AppResult<()> {
        tracing::info!(
            user = user_name,
            email = user_email,
            book = book_name,
            due = return_date_display,
            "borrow confirmation"
        );
        Ok(())
    }
}
