mod inmemory;
mod log;
mod webhook;

use attestation_scheduler_domain::{
    EscalationNotification, NotificationResult, ReminderNotification,
    UnregisteredEscalationNotification, UnregisteredReminderNotification,
};
pub use inmemory::{InMemoryNotificationGateway, SentNotification};
pub use log::LogNotificationGateway;
pub use webhook::WebhookNotificationGateway;

/// Performs the actual delivery of notifications.
///
/// A delivery failure can be reported either as an `Err` or as an unsuccessful
/// `NotificationResult`, callers treat both the same way. Implementations own
/// their per-call timeout.
#[async_trait::async_trait]
pub trait INotificationGateway: Send + Sync {
    async fn send_reminder(
        &self,
        notification: &ReminderNotification,
    ) -> anyhow::Result<NotificationResult>;

    async fn send_escalation(
        &self,
        notification: &EscalationNotification,
    ) -> anyhow::Result<NotificationResult>;

    async fn send_unregistered_reminder(
        &self,
        notification: &UnregisteredReminderNotification,
    ) -> anyhow::Result<NotificationResult>;

    async fn send_unregistered_escalation(
        &self,
        notification: &UnregisteredEscalationNotification,
    ) -> anyhow::Result<NotificationResult>;
}
