use super::IPendingInviteRepo;
use crate::repos::shared::inmemory_repo::*;
use attestation_scheduler_domain::{NotificationStage, PendingInvite, ID};
use chrono::{DateTime, Utc};

pub struct InMemoryPendingInviteRepo {
    invites: std::sync::Mutex<Vec<PendingInvite>>,
}

impl InMemoryPendingInviteRepo {
    pub fn new() -> Self {
        Self {
            invites: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IPendingInviteRepo for InMemoryPendingInviteRepo {
    async fn insert(&self, invite: &PendingInvite) -> anyhow::Result<()> {
        insert(invite, &self.invites);
        Ok(())
    }

    async fn save(&self, invite: &PendingInvite) -> anyhow::Result<()> {
        if !save(invite, &self.invites) {
            anyhow::bail!("Pending invite {} not found", invite.id);
        }
        Ok(())
    }

    async fn mark_sent(
        &self,
        invite_id: &ID,
        stage: NotificationStage,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if update(invite_id, &self.invites, |i| i.mark_sent(stage, at)).is_none() {
            anyhow::bail!("Pending invite {} not found", invite_id);
        }
        Ok(())
    }

    async fn find(&self, invite_id: &ID) -> anyhow::Result<Option<PendingInvite>> {
        Ok(find(invite_id, &self.invites))
    }

    async fn find_by_campaign(&self, campaign_id: &ID) -> anyhow::Result<Vec<PendingInvite>> {
        Ok(find_by(&self.invites, |i| i.campaign_id == *campaign_id))
    }
}
