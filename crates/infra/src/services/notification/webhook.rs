use super::INotificationGateway;
use crate::config::NotificationWebhookConfig;
use attestation_scheduler_domain::{
    EscalationNotification, NotificationResult, ReminderNotification,
    UnregisteredEscalationNotification, UnregisteredReminderNotification,
};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

const WEBHOOK_KEY_HEADER: &str = "attestation-scheduler-webhook-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NotificationEnvelope<'a, T: Serialize> {
    kind: &'static str,
    notification: &'a T,
}

/// Hands notifications over to an external delivery service (e.g. the mailer)
/// by posting them as JSON to a webhook.
pub struct WebhookNotificationGateway {
    client: Client,
    url: String,
    key: String,
}

impl WebhookNotificationGateway {
    pub fn new(config: &NotificationWebhookConfig, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            key: config.key.clone(),
        })
    }

    async fn post<T: Serialize + Sync>(
        &self,
        kind: &'static str,
        notification: &T,
    ) -> anyhow::Result<NotificationResult> {
        let res = self
            .client
            .post(&self.url)
            .header(WEBHOOK_KEY_HEADER, &self.key)
            .json(&NotificationEnvelope { kind, notification })
            .send()
            .await
            .map_err(|e| {
                error!("Error delivering {} notification: {:?}", kind, e);
                e
            })?;

        let status = res.status();
        if status.is_success() {
            Ok(NotificationResult::sent())
        } else {
            Ok(NotificationResult::failed(format!(
                "Notification endpoint responded with status {}",
                status
            )))
        }
    }
}

#[async_trait::async_trait]
impl INotificationGateway for WebhookNotificationGateway {
    async fn send_reminder(
        &self,
        notification: &ReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.post("attestation_reminder", notification).await
    }

    async fn send_escalation(
        &self,
        notification: &EscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.post("attestation_escalation", notification).await
    }

    async fn send_unregistered_reminder(
        &self,
        notification: &UnregisteredReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.post("unregistered_attestation_reminder", notification)
            .await
    }

    async fn send_unregistered_escalation(
        &self,
        notification: &UnregisteredEscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.post("unregistered_attestation_escalation", notification)
            .await
    }
}
