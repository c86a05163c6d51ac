use attestation_scheduler_domain::{
    AttestationStatus, Campaign, EscalationNotification, NotificationResult, ReminderNotification,
    UnregisteredEscalationNotification, UnregisteredReminderNotification, ID,
};
use attestation_scheduler_infra::{
    AttestationContext, INotificationGateway, InMemoryNotificationGateway, Repos, StaticTimeSys,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

pub struct TestContext {
    pub ctx: AttestationContext,
    pub notifications: Arc<InMemoryNotificationGateway>,
    pub sys: Arc<StaticTimeSys>,
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap()
}

pub fn setup() -> TestContext {
    let mut ctx = AttestationContext::create_inmemory();
    let notifications = Arc::new(InMemoryNotificationGateway::new());
    let sys = Arc::new(StaticTimeSys::new(now()));
    ctx.services.notifications = notifications.clone();
    ctx.sys = sys.clone();
    TestContext {
        ctx,
        notifications,
        sys,
    }
}

impl TestContext {
    /// Routes notifications through a `ConcurrentEditGateway` that completes
    /// `record` and registers `invite` mid-delivery
    pub fn edit_during_delivery(&mut self, record: Option<ID>, invite: Option<ID>) {
        self.ctx.services.notifications = Arc::new(ConcurrentEditGateway {
            inner: self.notifications.clone(),
            repos: self.ctx.repos.clone(),
            complete_record: record,
            register_invite: invite,
        });
    }

    pub async fn insert_campaign(&self, started_days_ago: i64) -> Campaign {
        let campaign = Campaign::new("Q4 laptops", now() - Duration::days(started_days_ago));
        self.ctx
            .repos
            .campaigns
            .insert(&campaign)
            .await
            .expect("To insert campaign");
        campaign
    }

    pub async fn save_campaign(&self, campaign: &Campaign) {
        self.ctx
            .repos
            .campaigns
            .save(campaign)
            .await
            .expect("To save campaign");
    }

    pub async fn campaign(&self, campaign_id: &ID) -> Campaign {
        self.ctx
            .repos
            .campaigns
            .find(campaign_id)
            .await
            .unwrap()
            .expect("To find campaign")
    }
}

/// Gateway that changes stored state the way the attestation and registration
/// flows would while a notification is being delivered, then delegates.
pub struct ConcurrentEditGateway {
    pub inner: Arc<InMemoryNotificationGateway>,
    pub repos: Repos,
    pub complete_record: Option<ID>,
    pub register_invite: Option<ID>,
}

impl ConcurrentEditGateway {
    async fn apply_edits(&self) -> anyhow::Result<()> {
        if let Some(record_id) = &self.complete_record {
            if let Some(mut record) = self.repos.attestation_records.find(record_id).await? {
                record.status = AttestationStatus::Completed;
                self.repos.attestation_records.save(&record).await?;
            }
        }
        if let Some(invite_id) = &self.register_invite {
            if let Some(mut invite) = self.repos.pending_invites.find(invite_id).await? {
                invite.registered_at = Some(now());
                self.repos.pending_invites.save(&invite).await?;
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl INotificationGateway for ConcurrentEditGateway {
    async fn send_reminder(
        &self,
        notification: &ReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.apply_edits().await?;
        self.inner.send_reminder(notification).await
    }

    async fn send_escalation(
        &self,
        notification: &EscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.apply_edits().await?;
        self.inner.send_escalation(notification).await
    }

    async fn send_unregistered_reminder(
        &self,
        notification: &UnregisteredReminderNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.apply_edits().await?;
        self.inner.send_unregistered_reminder(notification).await
    }

    async fn send_unregistered_escalation(
        &self,
        notification: &UnregisteredEscalationNotification,
    ) -> anyhow::Result<NotificationResult> {
        self.apply_edits().await?;
        self.inner.send_unregistered_escalation(notification).await
    }
}
