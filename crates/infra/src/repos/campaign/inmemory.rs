use super::ICampaignRepo;
use crate::repos::shared::inmemory_repo::*;
use attestation_scheduler_domain::{Campaign, ID};

pub struct InMemoryCampaignRepo {
    campaigns: std::sync::Mutex<Vec<Campaign>>,
}

impl InMemoryCampaignRepo {
    pub fn new() -> Self {
        Self {
            campaigns: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl ICampaignRepo for InMemoryCampaignRepo {
    async fn insert(&self, campaign: &Campaign) -> anyhow::Result<()> {
        insert(campaign, &self.campaigns);
        Ok(())
    }

    async fn save(&self, campaign: &Campaign) -> anyhow::Result<()> {
        if !save(campaign, &self.campaigns) {
            anyhow::bail!("Campaign {} not found", campaign.id);
        }
        Ok(())
    }

    async fn complete_if_active(&self, campaign_id: &ID) -> anyhow::Result<bool> {
        Ok(update(campaign_id, &self.campaigns, |c| c.complete()).unwrap_or(false))
    }

    async fn find(&self, campaign_id: &ID) -> anyhow::Result<Option<Campaign>> {
        Ok(find(campaign_id, &self.campaigns))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Campaign>> {
        Ok(find_all(&self.campaigns))
    }
}
