use crate::error::SchedulerError;
use crate::shared::{
    delivery::delivery_error,
    dispatch_queue::{DispatchOutcome, DispatchQueue, DispatchSummary},
    usecase::UseCase,
};
use attestation_scheduler_domain::{
    AttestationRecord, Campaign, EscalationNotification, NotificationStage,
};
use attestation_scheduler_infra::AttestationContext;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Notifies the manager of every registered participant who still has not
/// attested once the campaign's `escalation_days` have passed.
#[derive(Debug, Default)]
pub struct ProcessEscalationsUseCase {}

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
impl UseCase for ProcessEscalationsUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessEscalations";

    async fn execute(&mut self, ctx: &AttestationContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let campaigns = ctx
            .repos
            .campaigns
            .find_all()
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?
            .into_iter()
            .filter(|c| c.is_escalation_due(now))
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
                .filter(|record| record.needs_escalation())
                .map(|record| escalate_participant(campaign, record, ctx))
                .collect::<Vec<_>>();

            let campaign_summary = queue.run(jobs).await;
            info!(
                "Escalations for campaign {}: {:?}",
                campaign.id, campaign_summary
            );
            summary += campaign_summary;
        }

        Ok(summary)
    }
}

async fn escalate_participant(
    campaign: &Campaign,
    record: AttestationRecord,
    ctx: &AttestationContext,
) -> DispatchOutcome {
    let user = match ctx.repos.users.find(&record.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!(
                "Skipping escalation for record {}: user {} not found",
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
    let manager_email = match user.manager_contact_email() {
        Some(email) => email.to_string(),
        None => {
            debug!(
                "Skipping escalation for record {}: user {} has no manager",
                record.id, user.id
            );
            return DispatchOutcome::Skipped;
        }
    };

    let notification = EscalationNotification {
        to: manager_email,
        employee_name: user.display_name(),
        employee_email: user.contact_email().unwrap_or_default().to_string(),
        campaign: campaign.into(),
    };
    if let Some(err) =
        delivery_error(ctx.services.notifications.send_escalation(&notification).await)
    {
        warn!(
            "Escalation for record {} in campaign {} was not delivered, will retry next run. Err: {}",
            record.id, campaign.id, err
        );
        return DispatchOutcome::Failed;
    }

    match ctx
        .repos
        .attestation_records
        .mark_sent(&record.id, NotificationStage::Escalation, ctx.sys.now())
        .await
    {
        Ok(_) => DispatchOutcome::Sent,
        Err(e) => {
            error!(
                "Escalation for record {} was delivered but the marker could not be stored. Err: {:?}",
                record.id, e
            );
            DispatchOutcome::Failed
        }
    }
}
