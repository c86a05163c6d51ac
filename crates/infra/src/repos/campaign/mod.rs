mod inmemory;
mod postgres;

use attestation_scheduler_domain::{Campaign, ID};
pub use inmemory::InMemoryCampaignRepo;
pub use postgres::PostgresCampaignRepo;

#[async_trait::async_trait]
pub trait ICampaignRepo: Send + Sync {
    async fn insert(&self, campaign: &Campaign) -> anyhow::Result<()>;
    async fn save(&self, campaign: &Campaign) -> anyhow::Result<()>;
    /// Moves the campaign from active to completed and writes nothing else.
    /// Returns false if the campaign is not active (or unknown) and was left unchanged.
    async fn complete_if_active(&self, campaign_id: &ID) -> anyhow::Result<bool>;
    async fn find(&self, campaign_id: &ID) -> anyhow::Result<Option<Campaign>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Campaign>>;
}

#[cfg(test)]
mod tests {
    use crate::AttestationContext;
    use attestation_scheduler_domain::{Campaign, CampaignStatus};
    use chrono::Utc;

    #[tokio::test]
    async fn create_find_and_save() {
        let ctx = AttestationContext::create_inmemory();
        let mut campaign = Campaign::new("Q4 laptops", Utc::now());

        assert!(ctx.repos.campaigns.insert(&campaign).await.is_ok());
        let res = ctx.repos.campaigns.find(&campaign.id).await.unwrap();
        assert_eq!(res, Some(campaign.clone()));

        campaign.status = CampaignStatus::Completed;
        assert!(ctx.repos.campaigns.save(&campaign).await.is_ok());
        let all = ctx.repos.campaigns.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, CampaignStatus::Completed);
    }

    #[tokio::test]
    async fn saving_unknown_campaign_fails() {
        let ctx = AttestationContext::create_inmemory();
        let campaign = Campaign::new("Never inserted", Utc::now());
        assert!(ctx.repos.campaigns.save(&campaign).await.is_err());
    }

    #[tokio::test]
    async fn complete_if_active_only_moves_active_campaigns() {
        let ctx = AttestationContext::create_inmemory();
        let active = Campaign::new("Q4 laptops", Utc::now());
        let mut cancelled = Campaign::new("Q4 phones", Utc::now());
        cancelled.status = CampaignStatus::Cancelled;
        ctx.repos.campaigns.insert(&active).await.unwrap();
        ctx.repos.campaigns.insert(&cancelled).await.unwrap();

        assert!(ctx.repos.campaigns.complete_if_active(&active.id).await.unwrap());
        assert!(!ctx.repos.campaigns.complete_if_active(&active.id).await.unwrap());
        assert!(!ctx
            .repos
            .campaigns
            .complete_if_active(&cancelled.id)
            .await
            .unwrap());

        let active = ctx.repos.campaigns.find(&active.id).await.unwrap();
        assert_eq!(active.map(|c| c.status), Some(CampaignStatus::Completed));
        let cancelled = ctx.repos.campaigns.find(&cancelled.id).await.unwrap();
        assert_eq!(cancelled.map(|c| c.status), Some(CampaignStatus::Cancelled));
    }
}
