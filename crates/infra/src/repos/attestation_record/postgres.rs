use super::IAttestationRecordRepo;
use attestation_scheduler_domain::{AttestationRecord, NotificationStage, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresAttestationRecordRepo {
    pool: PgPool,
}

impl PostgresAttestationRecordRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AttestationRecordRaw {
    record_uid: Uuid,
    campaign_uid: Uuid,
    user_uid: Uuid,
    status: String,
    reminder_sent_at: Option<DateTime<Utc>>,
    escalation_sent_at: Option<DateTime<Utc>>,
}

impl TryFrom<AttestationRecordRaw> for AttestationRecord {
    type Error = anyhow::Error;

    fn try_from(e: AttestationRecordRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.record_uid.into(),
            campaign_id: e.campaign_uid.into(),
            user_id: e.user_uid.into(),
            status: e.status.parse()?,
            reminder_sent_at: e.reminder_sent_at,
            escalation_sent_at: e.escalation_sent_at,
        })
    }
}

const SELECT_RECORDS: &str = r#"
    SELECT record_uid, campaign_uid, user_uid, status, reminder_sent_at, escalation_sent_at
    FROM attestation_records
"#;

#[async_trait::async_trait]
impl IAttestationRecordRepo for PostgresAttestationRecordRepo {
    async fn insert(&self, record: &AttestationRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attestation_records
            (record_uid, campaign_uid, user_uid, status, reminder_sent_at, escalation_sent_at)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.inner_ref())
        .bind(record.campaign_id.inner_ref())
        .bind(record.user_id.inner_ref())
        .bind(record.status.as_str())
        .bind(record.reminder_sent_at)
        .bind(record.escalation_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert attestation record: {:?}. DB returned error: {:?}",
                record, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, record: &AttestationRecord) -> anyhow::Result<()> {
        // COALESCE keeps an already persisted marker even if a stale copy is saved
        let res = sqlx::query(
            r#"
            UPDATE attestation_records
            SET status = $2,
            reminder_sent_at = COALESCE(reminder_sent_at, $3),
            escalation_sent_at = COALESCE(escalation_sent_at, $4)
            WHERE record_uid = $1
            "#,
        )
        .bind(record.id.inner_ref())
        .bind(record.status.as_str())
        .bind(record.reminder_sent_at)
        .bind(record.escalation_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save attestation record: {:?}. DB returned error: {:?}",
                record, e
            );
            e
        })?;
        if res.rows_affected() == 0 {
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
        let query = format!(
            "UPDATE attestation_records SET {column} = COALESCE({column}, $2) WHERE record_uid = $1",
            column = stage.marker_column()
        );
        let res = sqlx::query(&query)
            .bind(record_id.inner_ref())
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to mark {:?} as sent for attestation record: {}. DB returned error: {:?}",
                    stage, record_id, e
                );
                e
            })?;
        if res.rows_affected() == 0 {
            anyhow::bail!("Attestation record {} not found", record_id);
        }
        Ok(())
    }

    async fn find(&self, record_id: &ID) -> anyhow::Result<Option<AttestationRecord>> {
        let query = format!("{} WHERE record_uid = $1", SELECT_RECORDS);
        let raw: Option<AttestationRecordRaw> = sqlx::query_as(&query)
            .bind(record_id.inner_ref())
            .fetch_optional(&self.pool)
            .await?;
        raw.map(AttestationRecord::try_from).transpose()
    }

    async fn find_by_campaign(&self, campaign_id: &ID) -> anyhow::Result<Vec<AttestationRecord>> {
        let query = format!("{} WHERE campaign_uid = $1", SELECT_RECORDS);
        let raws: Vec<AttestationRecordRaw> = sqlx::query_as(&query)
            .bind(campaign_id.inner_ref())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to list attestation records for campaign: {}. DB returned error: {:?}",
                    campaign_id, e
                );
                e
            })?;
        raws.into_iter().map(AttestationRecord::try_from).collect()
    }
}
