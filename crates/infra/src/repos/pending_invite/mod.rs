mod inmemory;
mod postgres;

use attestation_scheduler_domain::{NotificationStage, PendingInvite, ID};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryPendingInviteRepo;
pub use postgres::PostgresPendingInviteRepo;

#[async_trait::async_trait]
pub trait IPendingInviteRepo: Send + Sync {
    async fn insert(&self, invite: &PendingInvite) -> anyhow::Result<()>;
    /// Writes the invite as owned by the registration flow. Persisted timestamps are kept.
    async fn save(&self, invite: &PendingInvite) -> anyhow::Result<()>;
    /// Sets the send-once marker of `stage` unless it is already set. No other
    /// field is written, so a registration completed mid-dispatch survives.
    async fn mark_sent(
        &self,
        invite_id: &ID,
        stage: NotificationStage,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    async fn find(&self, invite_id: &ID) -> anyhow::Result<Option<PendingInvite>>;
    async fn find_by_campaign(&self, campaign_id: &ID) -> anyhow::Result<Vec<PendingInvite>>;
}
