use super::INotificationGateway;
use attestation_scheduler_domain::{
    EscalationNotification, NotificationResult, ReminderNotification,
    UnregisteredEscalationNotification, UnregisteredReminderNotification,
};
use tracing::info;

/// Used when no notification endpoint is configured. Every notification is
/// logged and reported as delivered.
pub struct LogNotificationGateway {}

#[async_trait::async_trait]
impl INotificationGateway for LogNotificationGateway {
    async fn send_reminder(
        &self,
        notification: &ReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        info!(
            "Reminder for campaign {} to {}",
            notification.campaign.campaign_id, notification.to
        );
        Ok(NotificationResult::sent())
    }

    async fn send_escalation(
        &self,
        notification: &EscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        info!(
            "Escalation for campaign {} to {} about {}",
            notification.campaign.campaign_id, notification.to, notification.employee_email
        );
        Ok(NotificationResult::sent())
    }

    async fn send_unregistered_reminder(
        &self,
        notification: &UnregisteredReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        info!(
            "Invite reminder for campaign {} to {} ({} assets)",
            notification.campaign.campaign_id, notification.to, notification.asset_count
        );
        Ok(NotificationResult::sent())
    }

    async fn send_unregistered_escalation(
        &self,
        notification: &UnregisteredEscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        info!(
            "Invite escalation for campaign {} to {} about {}",
            notification.campaign.campaign_id, notification.to, notification.invitee_email
        );
        Ok(NotificationResult::sent())
    }
}
