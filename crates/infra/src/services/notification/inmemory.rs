use super::INotificationGateway;
use attestation_scheduler_domain::{
    EscalationNotification, NotificationResult, ReminderNotification,
    UnregisteredEscalationNotification, UnregisteredReminderNotification,
};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum SentNotification {
    Reminder(ReminderNotification),
    Escalation(EscalationNotification),
    UnregisteredReminder(UnregisteredReminderNotification),
    UnregisteredEscalation(UnregisteredEscalationNotification),
}

impl SentNotification {
    pub fn recipient(&self) -> &str {
        match self {
            Self::Reminder(n) => &n.to,
            Self::Escalation(n) => &n.to,
            Self::UnregisteredReminder(n) => &n.to,
            Self::UnregisteredEscalation(n) => &n.to,
        }
    }
}

#[derive(Debug, Clone)]
struct Attempt {
    notification: SentNotification,
    delivered: bool,
}

/// Records every notification instead of delivering it. Recipients can be
/// configured to fail, either with an unsuccessful result or with an error.
pub struct InMemoryNotificationGateway {
    attempts: Mutex<Vec<Attempt>>,
    rejecting: Mutex<Vec<String>>,
    erroring: Mutex<Vec<String>>,
}

impl InMemoryNotificationGateway {
    pub fn new() -> Self {
        Self {
            attempts: Mutex::new(Vec::new()),
            rejecting: Mutex::new(Vec::new()),
            erroring: Mutex::new(Vec::new()),
        }
    }

    /// Sends to `email` will return an unsuccessful `NotificationResult`
    pub fn reject_for(&self, email: &str) {
        self.rejecting.lock().unwrap().push(email.to_lowercase());
    }

    /// Sends to `email` will return an error
    pub fn error_for(&self, email: &str) {
        self.erroring.lock().unwrap().push(email.to_lowercase());
    }

    /// Every send, whether it succeeded or not
    pub fn attempts(&self) -> Vec<SentNotification> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.notification.clone())
            .collect()
    }

    pub fn delivered(&self) -> Vec<SentNotification> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.delivered)
            .map(|a| a.notification.clone())
            .collect()
    }

    pub fn delivered_to(&self, email: &str) -> Vec<SentNotification> {
        self.delivered()
            .into_iter()
            .filter(|n| n.recipient().eq_ignore_ascii_case(email))
            .collect()
    }

    fn record(&self, notification: SentNotification) -> anyhow::Result<NotificationResult> {
        let recipient = notification.recipient().to_lowercase();
        let erroring = self.erroring.lock().unwrap().contains(&recipient);
        let rejecting = self.rejecting.lock().unwrap().contains(&recipient);
        self.attempts.lock().unwrap().push(Attempt {
            notification,
            delivered: !erroring && !rejecting,
        });

        if erroring {
            anyhow::bail!("Unable to reach mail server for {}", recipient);
        }
        if rejecting {
            return Ok(NotificationResult::failed(format!(
                "Recipient {} rejected",
                recipient
            )));
        }
        Ok(NotificationResult::sent())
    }
}

impl Default for InMemoryNotificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationGateway for InMemoryNotificationGateway {
    async fn send_reminder(
        &self,
        notification: &ReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.record(SentNotification::Reminder(notification.clone()))
    }

    async fn send_escalation(
        &self,
        notification: &EscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.record(SentNotification::Escalation(notification.clone()))
    }

    async fn send_unregistered_reminder(
        &self,
        notification: &UnregisteredReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.record(SentNotification::UnregisteredReminder(notification.clone()))
    }

    async fn send_unregistered_escalation(
        &self,
        notification: &UnregisteredEscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.record(SentNotification::UnregisteredEscalation(
            notification.clone(),
        ))
    }
}
