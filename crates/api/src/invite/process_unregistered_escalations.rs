use crate::error::SchedulerError;
use crate::shared::{
    delivery::delivery_error,
    dispatch_queue::{DispatchOutcome, DispatchQueue, DispatchSummary},
    usecase::UseCase,
};
use attestation_scheduler_domain::{
    Campaign, ManagerResolution, NotificationStage, PendingInvite,
    UnregisteredEscalationNotification,
};
use attestation_scheduler_infra::AttestationContext;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Notifies the manager of an asset owner who still has not registered once
/// the campaign's `escalation_days` have passed. The manager is resolved from
/// the owner's assets and must be unambiguous.
#[derive(Debug, Default)]
pub struct ProcessUnregisteredEscalationsUseCase {}

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
impl UseCase for ProcessUnregisteredEscalationsUseCase {
    type Response = DispatchSummary;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessUnregisteredEscalations";

    async fn execute(&mut self, ctx: &AttestationContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let campaigns = ctx
            .repos
            .campaigns
            .find_all()
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?
            .into_iter()
            .filter(|c| c.is_unregistered_escalation_due(now))
            .collect::<Vec<_>>();

        let queue = DispatchQueue::new(ctx.config.dispatch_concurrency);
        let mut summary = DispatchSummary::default();
        for campaign in &campaigns {
            let jobs = ctx
                .repos
                .pending_invites
                .find_by_campaign(&campaign.id)
                .await
                .map_err(|e| UseCaseError::StorageError(e.to_string()))?
                .into_iter()
                .filter(|invite| invite.needs_escalation())
                .map(|invite| escalate_invitee(campaign, invite, ctx))
                .collect::<Vec<_>>();

            let campaign_summary = queue.run(jobs).await;
            info!(
                "Unregistered escalations for campaign {}: {:?}",
                campaign.id, campaign_summary
            );
            summary += campaign_summary;
        }

        Ok(summary)
    }
}

async fn escalate_invitee(
    campaign: &Campaign,
    invite: PendingInvite,
    ctx: &AttestationContext,
) -> DispatchOutcome {
    let assets = match ctx.repos.assets.find_employee_assets(invite.email.trim()).await {
        Ok(assets) => assets,
        Err(e) => {
            error!(
                "Unable to look up assets for invite {}. Err: {:?}",
                invite.id, e
            );
            return DispatchOutcome::Failed;
        }
    };

    let manager_email = match assets.manager() {
        ManagerResolution::Found(email) => email,
        ManagerResolution::NoAssets => {
            debug!("Skipping escalation for invite {}: no assets", invite.id);
            return DispatchOutcome::Skipped;
        }
        ManagerResolution::NoManager => {
            debug!(
                "Skipping escalation for invite {}: no manager on any asset",
                invite.id
            );
            return DispatchOutcome::Skipped;
        }
        ManagerResolution::ConflictingManagers(managers) => {
            warn!(
                "Skipping escalation for invite {}: assets of {} name different managers {:?}",
                invite.id, invite.email, managers
            );
            return DispatchOutcome::Skipped;
        }
    };

    let notification = UnregisteredEscalationNotification {
        to: manager_email,
        invitee_name: invite.display_name(),
        invitee_email: invite.email.clone(),
        asset_count: assets.count(),
        campaign: campaign.into(),
    };
    if let Some(err) = delivery_error(
        ctx.services
            .notifications
            .send_unregistered_escalation(&notification)
            .await,
    ) {
        warn!(
            "Escalation for invite {} in campaign {} was not delivered, will retry next run. Err: {}",
            invite.id, campaign.id, err
        );
        return DispatchOutcome::Failed;
    }

    match ctx
        .repos
        .pending_invites
        .mark_sent(&invite.id, NotificationStage::Escalation, ctx.sys.now())
        .await
    {
        Ok(_) => DispatchOutcome::Sent,
        Err(e) => {
            error!(
                "Escalation for invite {} was delivered but the marker could not be stored. Err: {:?}",
                invite.id, e
            );
            DispatchOutcome::Failed
        }
    }
}
