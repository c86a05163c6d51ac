use crate::error::SchedulerError;
use crate::shared::{
    delivery::delivery_error,
    dispatch_queue::{DispatchOutcome, DispatchQueue, DispatchSummary},
    usecase::UseCase,
};
use attestation_scheduler_domain::{
    AttestationRecord, Campaign, NotificationStage, ReminderNotification,
};
use attestation_scheduler_infra::AttestationContext;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Sends the first-stage reminder to every registered participant of an active
/// `Campaign` who has not attested yet, once the campaign's `reminder_days`
/// have passed.
#[derive(Debug, Default)]
pub struct ProcessRemindersUseCase {}

#[derive(Error, Debug, PartialEq)]
pub enum UseCaseError {
    #[error("{0}")]
    StorageError(String),
}

impl From<UseCaseError> for SchedulerError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError(msg) => Self::StorageError(msg),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ProcessRemindersUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessReminders";

    async fn execute(&mut self, ctx: &AttestationContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let campaigns = ctx
            .repos
            .campaigns
            .find_all()
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?
            .into_iter()
            .filter(|c| c.is_reminder_due(now))
            .collect::<Vec<_>>();

        let queue = DispatchQueue::new(ctx.config.dispatch_concurrency);
        let mut summary = DispatchSummary::default();
        for campaign in &campaigns {
            let jobs = ctx
                .repos
                .attestation_records
                .find_by_campaign(&campaign.id)
                .await
                .map_err(|e| UseCaseError::StorageError(e.to_string()))?
                .into_iter()
                .filter(|record| record.needs_reminder())
                .map(|record| remind_participant(campaign, record, ctx))
                .collect::<Vec<_>>();

            let campaign_summary = queue.run(jobs).await;
            info!(
                "Reminders for campaign {}: {:?}",
                campaign.id, campaign_summary
            );
            summary += campaign_summary;
        }

        Ok(summary)
    }
}

async fn remind_participant(
    campaign: &Campaign,
    record: AttestationRecord,
    ctx: &AttestationContext,
) -> DispatchOutcome {
    let user = match ctx.repos.users.find(&record.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!(
                "Skipping reminder for record {}: user {} not found",
                record.id, record.user_id
            );
            return DispatchOutcome::Skipped;
        }
        Err(e) => {
            error!(
                "Unable to look up user {} for record {}. Err: {:?}",
                record.user_id, record.id, e
            );
            return DispatchOutcome::Failed;
        }
    };
    let email = match user.contact_email() {
        Some(email) => email.to_string(),
        None => {
            debug!(
                "Skipping reminder for record {}: user {} has no email",
                record.id, user.id
            );
            return DispatchOutcome::Skipped;
        }
    };

    let notification = ReminderNotification {
        recipient_name: user.display_name(),
        to: email,
        campaign: campaign.into(),
    };
    if let Some(err) = delivery_error(ctx.services.notifications.send_reminder(&notification).await)
    {
        warn!(
            "Reminder for record {} in campaign {} was not delivered, will retry next run. Err: {}",
            record.id, campaign.id, err
        );
        return DispatchOutcome::Failed;
    }

    match ctx
        .repos
        .attestation_records
        .mark_sent(&record.id, NotificationStage::Reminder, ctx.sys.now())
        .await
    {
        Ok(_) => DispatchOutcome::Sent,
        Err(e) => {
            error!(
                "Reminder for record {} was delivered but the marker could not be stored. Err: {:?}",
                record.id, e
            );
            DispatchOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::{now, setup};
    use attestation_scheduler_domain::{AttestationStatus, User};
    use chrono::Duration;

    #[tokio::test]
    async fn sends_one_reminder_and_sets_marker() {
        let test = setup();
        let campaign = test.insert_campaign(10).await;
        let user = User::new("kari@example.com");
        test.ctx.repos.users.insert(&user).await.unwrap();
        let record = AttestationRecord::new(campaign.id, user.id);
        test.ctx
            .repos
            .attestation_records
            .insert(&record)
            .await
            .unwrap();

        let mut usecase = ProcessRemindersUseCase::default();
        let res = usecase.execute(&test.ctx).await.unwrap();
        assert_eq!(res.sent, 1);
        assert_eq!(test.notifications.delivered_to("kari@example.com").len(), 1);

        let stored = test
            .ctx
            .repos
            .attestation_records
            .find(&record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.reminder_sent_at, Some(now()));
        assert!(stored.escalation_sent_at.is_none());
    }

    #[tokio::test]
    async fn second_pass_sends_nothing() {
        let test = setup();
        let campaign = test.insert_campaign(10).await;
        let user = User::new("kari@example.com");
        test.ctx.repos.users.insert(&user).await.unwrap();
        test.ctx
            .repos
            .attestation_records
            .insert(&AttestationRecord::new(campaign.id, user.id))
            .await
            .unwrap();

        ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        let res = ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res, DispatchSummary::default());
        assert_eq!(test.notifications.attempts().len(), 1);
    }

    #[tokio::test]
    async fn nothing_is_sent_before_threshold() {
        let test = setup();
        let campaign = test.insert_campaign(6).await;
        let user = User::new("kari@example.com");
        test.ctx.repos.users.insert(&user).await.unwrap();
        test.ctx
            .repos
            .attestation_records
            .insert(&AttestationRecord::new(campaign.id, user.id))
            .await
            .unwrap();

        ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert!(test.notifications.attempts().is_empty());

        test.sys.advance(Duration::days(1));
        let res = ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.sent, 1);
    }

    #[tokio::test]
    async fn completed_records_are_never_reminded() {
        let test = setup();
        let campaign = test.insert_campaign(100).await;
        let user = User::new("kari@example.com");
        test.ctx.repos.users.insert(&user).await.unwrap();
        let mut record = AttestationRecord::new(campaign.id, user.id);
        record.status = AttestationStatus::Completed;
        test.ctx
            .repos
            .attestation_records
            .insert(&record)
            .await
            .unwrap();

        ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert!(test.notifications.attempts().is_empty());
    }

    #[tokio::test]
    async fn unreachable_participants_are_skipped() {
        let test = setup();
        let campaign = test.insert_campaign(10).await;
        let mut no_email = User::new("");
        no_email.email = None;
        test.ctx.repos.users.insert(&no_email).await.unwrap();
        test.ctx
            .repos
            .attestation_records
            .insert(&AttestationRecord::new(campaign.id, no_email.id))
            .await
            .unwrap();
        // Record pointing at a user missing from the directory
        test.ctx
            .repos
            .attestation_records
            .insert(&AttestationRecord::new(campaign.id, Default::default()))
            .await
            .unwrap();

        let res = ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.skipped, 2);
        assert_eq!(res.failed, 0);
        assert!(test.notifications.attempts().is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_leaves_marker_unset_and_continues() {
        let test = setup();
        let campaign = test.insert_campaign(10).await;
        let failing = User::new("a@example.com");
        let working = User::new("b@example.com");
        test.ctx.repos.users.insert(&failing).await.unwrap();
        test.ctx.repos.users.insert(&working).await.unwrap();
        let record_a = AttestationRecord::new(campaign.id, failing.id);
        let record_b = AttestationRecord::new(campaign.id, working.id);
        test.ctx
            .repos
            .attestation_records
            .insert(&record_a)
            .await
            .unwrap();
        test.ctx
            .repos
            .attestation_records
            .insert(&record_b)
            .await
            .unwrap();
        test.notifications.error_for("a@example.com");

        let res = ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.sent, 1);
        assert_eq!(res.failed, 1);

        let records = &test.ctx.repos.attestation_records;
        let a = records.find(&record_a.id).await.unwrap().unwrap();
        let b = records.find(&record_b.id).await.unwrap().unwrap();
        assert!(a.reminder_sent_at.is_none());
        assert!(b.reminder_sent_at.is_some());
    }

    #[tokio::test]
    async fn inactive_campaigns_are_ignored() {
        let test = setup();
        let mut campaign = test.insert_campaign(10).await;
        campaign.status = attestation_scheduler_domain::CampaignStatus::Completed;
        test.save_campaign(&campaign).await;
        let user = User::new("kari@example.com");
        test.ctx.repos.users.insert(&user).await.unwrap();
        test.ctx
            .repos
            .attestation_records
            .insert(&AttestationRecord::new(campaign.id, user.id))
            .await
            .unwrap();

        ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert!(test.notifications.attempts().is_empty());
    }

    #[tokio::test]
    async fn completion_during_delivery_is_kept() {
        let mut test = setup();
        let campaign = test.insert_campaign(10).await;
        let user = User::new("kari@example.com");
        test.ctx.repos.users.insert(&user).await.unwrap();
        let record = AttestationRecord::new(campaign.id, user.id);
        test.ctx
            .repos
            .attestation_records
            .insert(&record)
            .await
            .unwrap();
        test.edit_during_delivery(Some(record.id), None);

        let res = ProcessRemindersUseCase::default()
            .execute(&test.ctx)
            .await
            .unwrap();
        assert_eq!(res.sent, 1);

        let stored = test
            .ctx
            .repos
            .attestation_records
            .find(&record.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, AttestationStatus::Completed);
        assert_eq!(stored.reminder_sent_at, Some(now()));
    }
}
