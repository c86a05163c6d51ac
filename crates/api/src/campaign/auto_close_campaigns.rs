use crate::error::SchedulerError;
use crate::shared::usecase::UseCase;
use attestation_scheduler_domain::ID;
use attestation_scheduler_infra::AttestationContext;
use thiserror::Error;
use tracing::{debug, info};

/// Completes every active campaign whose end date has passed.
/// Returns the ids of the campaigns that were closed by this execution.
#[derive(Debug, Default)]
pub struct AutoCloseCampaignsUseCase {}

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
impl UseCase for AutoCloseCampaignsUseCase {
    type Response = Vec<ID>;

    type Error = UseCaseError;

    const NAME: &'static str = "AutoCloseCampaigns";

    async fn execute(&mut self, ctx: &AttestationContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let expired = ctx
            .repos
            .campaigns
            .find_all()
            .await
            .map_err(|e| UseCaseError::StorageError(e.to_string()))?
            .into_iter()
            .filter(|c| c.is_expired(now));

        let mut closed = Vec::new();
        for campaign in expired {
            let completed = ctx
                .repos
                .campaigns
                .complete_if_active(&campaign.id)
                .await
                .map_err(|e| UseCaseError::StorageError(e.to_string()))?;
            if completed {
                info!("Campaign {} ended and was completed", campaign.id);
                closed.push(campaign.id);
            } else {
                debug!("Campaign {} was no longer active", campaign.id);
            }
        }

        Ok(closed)
    }
}
