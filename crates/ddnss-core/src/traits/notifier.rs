// # Notifier Trait
//
// Defines the interface for reaching the operator out of band.
//
// ## Implementations
//
// - SMTP with STARTTLS: `ddnss-notify-smtp` crate

use async_trait::async_trait;

/// Trait for operator notification channels
///
/// Implementations return their failures; they never log them. The
/// `Journal` records a failed send at DEBUG level and never notifies
/// about it, so a broken mail relay cannot cause a notification loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one plain-text message to the configured recipient
    async fn send(&self, subject: &str, body: &str) -> Result<(), crate::Error>;
}
