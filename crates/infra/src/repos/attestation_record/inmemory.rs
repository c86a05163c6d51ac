use super::IAttestationRecordRepo;
use crate::repos::shared::inmemory_repo::*;
use attestation_scheduler_domain::{AttestationRecord, NotificationStage, ID};
use chrono::{DateTime, Utc};

pub struct InMemoryAttestationRecordRepo {
    records: std::sync::Mutex<Vec<AttestationRecord>>,
}

impl InMemoryAttestationRecordRepo {
    pub fn new() -> Self {
        Self {
            records: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IAttestationRecordRepo for InMemoryAttestationRecordRepo {
    async fn insert(&self, record: &AttestationRecord) -> anyhow::Result<()> {
        insert(record, &self.records);
        Ok(())
    }

    async fn save(&self, record: &AttestationRecord) -> anyhow::Result<()> {
        if !save(record, &self.records) {
            anyhow::bail!("Attestation record {} not found", record.id);
        }
        Ok(())
    }

    async fn mark_sent(
        &self,
        record_id: &ID,
        stage: NotificationStage,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if update(record_id, &self.records, |r| r.mark_sent(stage, at)).is_none() {
            anyhow::bail!("Attestation record {} not found", record_id);
        }
        Ok(())
    }

    async fn find(&self, record_id: &ID) -> anyhow::Result<Option<AttestationRecord>> {
        Ok(find(record_id, &self.records))
    }

    async fn find_by_campaign(&self, campaign_id: &ID) -> anyhow::Result<Vec<AttestationRecord>> {
        Ok(find_by(&self.records, |r| r.campaign_id == *campaign_id))
    }
}
