use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use crate::config::{MailConfig, SmtpSettings};
use crate::models::OutgoingEmail;
use crate::utils::AppError;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError>;
}

/// Delivers through an SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings, from: &str) -> Result<Self, AppError> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| AppError::ConfigError(format!("Invalid MAIL_FROM '{}': {}", from, e)))?;

        let mut builder = if settings.tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)
                .map_err(|e| AppError::ConfigError(format!("Invalid SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
        };
        builder = builder.port(settings.port);

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::InvalidRequest(format!("Invalid recipient '{}': {}", email.to, e)))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
            .map_err(|e| AppError::MailError(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::MailError(format!("SMTP delivery failed: {}", e)))?;

        log::info!("📧 Mail sent to {}: {}", email.to, email.subject);
        Ok(())
    }
}

/// Writes mail to the log instead of delivering it. Used when no SMTP host is configured.
pub struct ConsoleMailer;

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        log::info!("📧 [console] To: {} | Subject: {}", email.to, email.subject);
        log::debug!("{}", email.text);
        Ok(())
    }
}

pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, AppError> {
    match &config.smtp {
        Some(smtp) => {
            log::info!("📧 SMTP relay: {}:{}", smtp.host, smtp.port);
            Ok(Arc::new(SmtpMailer::new(smtp, &config.from)?))
        }
        None => {
            log::warn!("⚠️  SMTP_HOST not set, mail will only be logged");
            Ok(Arc::new(ConsoleMailer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp(tls: bool) -> SmtpSettings {
        SmtpSettings {
            host: "localhost".into(),
            port: 2525,
            username: None,
            password: None,
            tls,
        }
    }

    #[test]
    fn test_without_smtp_host_falls_back_to_console() {
        let config = MailConfig {
            smtp: None,
            from: "Back Office <noreply@example.com>".into(),
            organization: "Back Office".into(),
        };
        assert!(build_mailer(&config).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_sender_is_a_config_error() {
        let result = SmtpMailer::new(&smtp(false), "not an address");
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected_before_delivery() {
        let mailer = SmtpMailer::new(&smtp(false), "noreply@example.com").unwrap();
        let result = mailer
            .send(OutgoingEmail {
                to: "nobody".into(),
                subject: "Hi".into(),
                text: "Hi".into(),
                html: "<p>Hi</p>".into(),
            })
            .await;
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_console_mailer_accepts_everything() {
        let result = ConsoleMailer
            .send(OutgoingEmail {
                to: "ann@example.com".into(),
                subject: "Hi".into(),
                text: "Hi".into(),
                html: "<p>Hi</p>".into(),
            })
            .await;
        assert!(result.is_ok());
    }
}
