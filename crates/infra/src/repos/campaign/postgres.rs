use super::ICampaignRepo;
use attestation_scheduler_domain::{Campaign, CampaignStatus, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresCampaignRepo {
    pool: PgPool,
}

impl PostgresCampaignRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CampaignRaw {
    campaign_uid: Uuid,
    name: String,
    status: String,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    reminder_days: i64,
    escalation_days: i64,
    unregistered_reminder_days: Option<i64>,
}

impl TryFrom<CampaignRaw> for Campaign {
    type Error = anyhow::Error;

    fn try_from(e: CampaignRaw) -> anyhow::Result<Self> {
        Ok(Self {
            id: e.campaign_uid.into(),
            name: e.name,
            status: e.status.parse()?,
            start_date: e.start_date,
            end_date: e.end_date,
            reminder_days: e.reminder_days,
            escalation_days: e.escalation_days,
            unregistered_reminder_days: e.unregistered_reminder_days,
        })
    }
}

const SELECT_CAMPAIGNS: &str = r#"
    SELECT campaign_uid, name, status, start_date, end_date,
    reminder_days, escalation_days, unregistered_reminder_days
    FROM campaigns
"#;

#[async_trait::async_trait]
impl ICampaignRepo for PostgresCampaignRepo {
    async fn insert(&self, campaign: &Campaign) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO campaigns
            (campaign_uid, name, status, start_date, end_date,
            reminder_days, escalation_days, unregistered_reminder_days)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(campaign.id.inner_ref())
        .bind(&campaign.name)
        .bind(campaign.status.as_str())
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.reminder_days)
        .bind(campaign.escalation_days)
        .bind(campaign.unregistered_reminder_days)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert campaign: {:?}. DB returned error: {:?}",
                campaign, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, campaign: &Campaign) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE campaigns
            SET name = $2,
            status = $3,
            start_date = $4,
            end_date = $5,
            reminder_days = $6,
            escalation_days = $7,
            unregistered_reminder_days = $8
            WHERE campaign_uid = $1
            "#,
        )
        .bind(campaign.id.inner_ref())
        .bind(&campaign.name)
        .bind(campaign.status.as_str())
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.reminder_days)
        .bind(campaign.escalation_days)
        .bind(campaign.unregistered_reminder_days)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save campaign: {:?}. DB returned error: {:?}",
                campaign, e
            );
            e
        })?;
        if res.rows_affected() == 0 {
            anyhow::bail!("Campaign {} not found", campaign.id);
        }
        Ok(())
    }

    async fn complete_if_active(&self, campaign_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE campaigns
            SET status = $2
            WHERE campaign_uid = $1 AND status = $3
            "#,
        )
        .bind(campaign_id.inner_ref())
        .bind(CampaignStatus::Completed.as_str())
        .bind(CampaignStatus::Active.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to complete campaign: {}. DB returned error: {:?}",
                campaign_id, e
            );
            e
        })?;
        Ok(res.rows_affected() > 0)
    }

    async fn find(&self, campaign_id: &ID) -> anyhow::Result<Option<Campaign>> {
        let query = format!("{} WHERE campaign_uid = $1", SELECT_CAMPAIGNS);
        let raw: Option<CampaignRaw> = sqlx::query_as(&query)
            .bind(campaign_id.inner_ref())
            .fetch_optional(&self.pool)
            .await?;
        raw.map(Campaign::try_from).transpose()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Campaign>> {
        let raws: Vec<CampaignRaw> = sqlx::query_as(SELECT_CAMPAIGNS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Unable to list campaigns. DB returned error: {:?}", e);
                e
            })?;
        raws.into_iter().map(Campaign::try_from).collect()
    }
}
