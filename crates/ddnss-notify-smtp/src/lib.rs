// # SMTP Notifier
//
// This crate mails operator notifications for the DDNSS updater.
//
// ## Session
//
// 1. Connect to `smtp_server:smtp_port`
// 2. Upgrade with STARTTLS
// 3. Log in with `user` / `password`
// 4. Send one plain-text message from `sender` to `recipient`
//
// A new session is opened per message; a run sends at most a handful.
//
// ## Failure Policy
//
// Every failure is returned as `Error::Notification`. This crate never
// logs to the operator journal; the journal records the failure at DEBUG
// and does not try to mail about it.

use async_trait::async_trait;
use ddnss_core::config::{MailSettings, NetworkSettings};
use ddnss_core::traits::Notifier;
use ddnss_core::{Error, Result};
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// Default SMTP session timeout (10 seconds)
pub const DEFAULT_SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Operator notifier over SMTP with STARTTLS
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the password.
pub struct SmtpNotifier {
    server: String,
    port: u16,
    user: String,
    /// ⚠️ NEVER log this value
    password: String,
    sender: Mailbox,
    recipient: Mailbox,
    timeout: Duration,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<REDACTED>")
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .finish()
    }
}

impl SmtpNotifier {
    /// Create a notifier from the `[MAIL]` settings
    ///
    /// Fails if the sender or recipient is not a valid mailbox.
    pub fn new(mail: &MailSettings, timeout: Duration) -> Result<Self> {
        let sender: Mailbox = mail
            .sender
            .parse()
            .map_err(|e| Error::config(format!("Invalid sender {}: {}", mail.sender, e)))?;
        let recipient: Mailbox = mail
            .recipient
            .parse()
            .map_err(|e| Error::config(format!("Invalid recipient {}: {}", mail.recipient, e)))?;

        Ok(Self {
            server: mail.smtp_server.clone(),
            port: mail.smtp_port,
            user: mail.user.clone(),
            password: mail.password.clone(),
            sender,
            recipient,
            timeout,
        })
    }

    /// Create a notifier from the `[MAIL]` and `[NETWORK]` settings
    pub fn from_settings(mail: &MailSettings, network: &NetworkSettings) -> Result<Self> {
        Self::new(mail, network.smtp_timeout())
    }

    /// Build the plain-text message for one notification
    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message> {
        Message::builder()
            .from(self.sender.clone())
            .to(self.recipient.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| Error::notification(format!("Failed to build message: {}", e)))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.server)
            .map_err(|e| Error::notification(format!("Failed to set up relay {}: {}", self.server, e)))?
            .port(self.port)
            .credentials(Credentials::new(self.user.clone(), self.password.clone()))
            .timeout(Some(self.timeout))
            .build();

        Ok(transport)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let message = self.build_message(subject, body)?;
        let transport = self.transport()?;

        tracing::debug!(
            "Sending \"{}\" via {}:{} to {}",
            subject,
            self.server,
            self.port,
            self.recipient
        );

        transport
            .send(message)
            .await
            .map_err(|e| Error::notification(e.to_string()))?;

        Ok(())
    }
}
