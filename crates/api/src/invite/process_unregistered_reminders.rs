use crate::error::SchedulerError;
use crate::shared::{
    delivery::delivery_error,
    dispatch_queue::{DispatchOutcome, DispatchQueue, DispatchSummary},
    usecase::UseCase,
};
use attestation_scheduler_domain::{
    Campaign, NotificationStage, PendingInvite, SsoConfig, UnregisteredReminderNotification,
};
use attestation_scheduler_infra::AttestationContext;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Reminds asset owners without an account to register and attest.
///
/// The threshold is the campaign's `unregistered_reminder_days`, or
/// `DEFAULT_UNREGISTERED_REMINDER_DAYS` when it is not configured. The SSO
/// settings are fetched once per execution and shared by every reminder.
#[derive(Debug, Default)]
pub struct ProcessUnregisteredRemindersUseCase {}

#[derive(Error, Debug, PartialEq)]
pub enum UseCaseError {
    #[error("{0}")]
    StorageError(String),
    #[error("{0}")]
    SsoConfigUnavailable(String),
}

impl From<UseCaseError> for SchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(msg) => Self::StorageError(msg),
            UseCaseError::SsoConfigUnavailable(msg) => Self::SsoConfigUnavailable(msg),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ProcessUnregisteredRemindersUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessUnregisteredReminders";

    async fn execute(&mut self, ctx: &AttestationContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let campaigns = ctx
            .repos
            .campaigns
            .find_all()
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?
            .into_iter()
            .filter(|c| c.is_unregistered_reminder_due(now))
            .collect::<Vec<_>>();

        let mut summary = DispatchSummary::default();
        if campaigns.is_empty() {
            return Ok(summary);
        }

        let sso_config = ctx
            .services
            .sso
            .get_config()
            .await
            .map_err(|e| UseCaseError::SsoConfigUnavailable(e.to_string()))?;
        let sso = &sso_config;

        let queue = DispatchQueue::new(ctx.config.dispatch_concurrency);
        for campaign in &campaigns {
            let jobs = ctx
                .repos
                .pending_invites
                .find_by_campaign(&campaign.id)
                .await
                .map_err(|e| UseCaseError::StorageError(e.to_string()))?
                .into_iter()
                .filter(|invite| invite.needs_reminder())
                .map(|invite| remind_invitee(campaign, invite, sso, ctx))
                .collect::<Vec<_>>();

            let campaign_summary = queue.run(jobs).await;
            info!(
                "Unregistered reminders for campaign {}: {:?}",
                campaign.id, campaign_summary
            );
            summary += campaign_summary;
        }

        Ok(summary)
    }
}

async fn remind_invitee(
    campaign: &Campaign,
    invite: PendingInvite,
    sso: &SsoConfig,
    ctx: &AttestationContext,
) -> DispatchOutcome {
    let email = invite.email.trim().to_string();
    if email.is_empty() {
        debug!("Skipping reminder for invite {}: no email", invite.id);
        return DispatchOutcome::Skipped;
    }

    // Only informs the message. Zero assets still gets a reminder.
    let asset_count = match ctx.repos.assets.find_by_employee_email(&email).await {
        Ok(assets) => assets.len(),
        Err(e) => {
            error!(
                "Unable to look up assets for invite {}. Err: {:?}",
                invite.id, e
            );
            return DispatchOutcome::Failed;
        }
    };

    let notification = UnregisteredReminderNotification {
        to: email,
        first_name: invite.first_name.clone(),
        last_name: invite.last_name.clone(),
        invite_token: invite.invite_token.clone(),
        asset_count,
        sso: sso.clone(),
        campaign: campaign.into(),
    };
    if let Some(err) = delivery_error(
        ctx.services
            .notifications
            .send_unregistered_reminder(&notification)
            .await,
    ) {
        warn!(
            "Reminder for invite {} in campaign {} was not delivered, will retry next run. Err: {}",
            invite.id, campaign.id, err
        );
        return DispatchOutcome::Failed;
    }

    match ctx
        .repos
        .pending_invites
        .mark_sent(&invite.id, NotificationStage::Reminder, ctx.sys.now())
        .await
    {
        Ok(_) => DispatchOutcome::Sent,
        Err(e) => {
            error!(
                "Reminder for invite {} was delivered but the marker could not be stored. Err: {:?}",
                invite.id, e
            );
            DispatchOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{now, setup, TestContext};
    use attestation_scheduler_domain::Asset;
    use attestation_scheduler_infra::{ISsoConfigProvider, SentNotification};
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSsoProvider {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ISsoConfigProvider for CountingSsoProvider {
        async fn get_config(&self) -> anyhow::Result<SsoConfig> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(SsoConfig {
                enabled: true,
                button_label: Some("Sign in with Okta".into()),
            })
        }
    }

    struct BrokenSsoProvider {}

    #[async_trait::async_trait]
    impl ISsoConfigProvider for BrokenSsoProvider {
        async fn get_config(&self) -> anyhow::Result<SsoConfig> {
            anyhow::bail!("identity provider unreachable")
        }
    }

    async fn insert_invite(test: &TestContext, campaign: &Campaign, email: &str) -> PendingInvite {
        let invite = PendingInvite::new(campaign.id, email, format!("token-{}", email));
        test.ctx
            .repos
            .pending_invites
            .insert(&invite)
            .await
            .unwrap();
        invite
    }

    #[tokio::test]
    async fn uses_default_threshold_when_unset() {
        let test = setup();
        let campaign = test.insert_campaign(6).await;
        assert!(campaign.unregistered_reminder_days.is_none());
        let invite = insert_invite(&test, &campaign, "new@example.com").await;

        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res, DispatchSummary::default());

        test.sys.advance(Duration::days(1));
        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.sent, 1);
        let stored = test
            .ctx
            .repos
            .pending_invites
            .find(&invite.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.reminder_sent_at, Some(now() + Duration::days(1)));
    }

    #[tokio::test]
    async fn configured_threshold_overrides_default() {
        let test = setup();
        let mut campaign = test.insert_campaign(3).await;
        campaign.unregistered_reminder_days = Some(3);
        test.save_campaign(&campaign).await;
        insert_invite(&test, &campaign, "new@example.com").await;

        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.sent, 1);
    }

    #[tokio::test]
    async fn registered_invites_are_excluded() {
        let test = setup();
        let campaign = test.insert_campaign(30).await;
        let mut invite = insert_invite(&test, &campaign, "new@example.com").await;
        invite.registered_at = Some(now() - Duration::days(1));
        test.ctx
            .repos
            .pending_invites
            .save(&invite)
            .await
            .unwrap();

        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res, DispatchSummary::default());
        assert!(test.notifications.attempts().is_empty());
    }

    #[tokio::test]
    async fn includes_asset_count_and_sso_and_reminds_without_assets() {
        let mut test = setup();
        let sso = Arc::new(CountingSsoProvider {
            calls: AtomicUsize::new(0),
        });
        test.ctx.services.sso = sso.clone();
        let campaign = test.insert_campaign(10).await;
        insert_invite(&test, &campaign, "owner@example.com").await;
        insert_invite(&test, &campaign, "noassets@example.com").await;
        for name in ["MacBook Pro", "iPhone"] {
            test.ctx
                .repos
                .assets
                .insert(&Asset::new(name, "owner@example.com"))
                .await
                .unwrap();
        }

        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.sent, 2);
        assert_eq!(sso.calls.load(Ordering::SeqCst), 1);

        let asset_count = |email: &str| match &test.notifications.delivered_to(email)[0] {
            SentNotification::UnregisteredReminder(n) => {
                assert!(n.sso.enabled);
                assert_eq!(n.invite_token, format!("token-{}", email));
                n.asset_count
            }
            other => panic!("Expected unregistered reminder, got {:?}", other),
        };
        assert_eq!(asset_count("owner@example.com"), 2);
        assert_eq!(asset_count("noassets@example.com"), 0);
    }

    #[tokio::test]
    async fn sso_is_not_fetched_when_nothing_is_due() {
        let mut test = setup();
        let sso = Arc::new(CountingSsoProvider {
            calls: AtomicUsize::new(0),
        });
        test.ctx.services.sso = sso.clone();
        let campaign = test.insert_campaign(1).await;
        insert_invite(&test, &campaign, "new@example.com").await;

        ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(sso.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unavailable_sso_config_fails_the_stage() {
        let mut test = setup();
        test.ctx.services.sso = Arc::new(BrokenSsoProvider {});
        let campaign = test.insert_campaign(10).await;
        insert_invite(&test, &campaign, "new@example.com").await;

        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await;
        assert!(matches!(res, Err(UseCaseError::SsoConfigUnavailable(_))));
        assert!(test.notifications.attempts().is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_is_retried_next_run() {
        let test = setup();
        let campaign = test.insert_campaign(10).await;
        let invite = insert_invite(&test, &campaign, "new@example.com").await;
        test.notifications.reject_for("new@example.com");

        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.failed, 1);
        let stored = test
            .ctx
            .repos
            .pending_invites
            .find(&invite.id)
            .await
            .unwrap()
            .unwrap();
        assert!(stored.reminder_sent_at.is_none());
    }

    #[tokio::test]
    async fn registration_during_delivery_is_kept() {
        let mut test = setup();
        let campaign = test.insert_campaign(10).await;
        let invite = insert_invite(&test, &campaign, "new@example.com").await;
        test.edit_during_delivery(None, Some(invite.id));

        let res = ProcessUnregisteredRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.sent, 1);

        let stored = test
            .ctx
            .repos
            .pending_invites
            .find(&invite.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.registered_at, Some(now()));
        assert_eq!(stored.reminder_sent_at, Some(now()));
    }
}
