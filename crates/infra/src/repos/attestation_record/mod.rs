mod inmemory;
mod postgres;

use attestation_scheduler_domain::{AttestationRecord, NotificationStage, ID};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryAttestationRecordRepo;
pub use postgres::PostgresAttestationRecordRepo;

#[async_trait::async_trait]
pub trait IAttestationRecordRepo: Send + Sync {
    async fn insert(&self, record: &AttestationRecord) -> anyhow::Result<()>;
    /// Writes the record as owned by the attestation flow. Persisted markers are kept.
    async fn save(&self, record: &AttestationRecord) -> anyhow::Result<()>;
    /// Sets the send-once marker of `stage` unless it is already set. No other
    /// field is written, so changes made while a notification was in flight survive.
    async fn mark_sent(
        &self,
        record_id: &ID,
        stage: NotificationStage,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    async fn find(&self, record_id: &ID) -> anyhow::Result<Option<AttestationRecord>>;
    async fn find_by_campaign(&self, campaign_id: &ID) -> anyhow::Result<Vec<AttestationRecord>>;
}
