use super::IPendingInviteRepo;
use attestation_scheduler_domain::{NotificationStage, PendingInvite, ID};
use chrono::{DateTime, Utc};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresPendingInviteRepo {
    pool: PgPool,
}

impl PostgresPendingInviteRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PendingInviteRaw {
    invite_uid: Uuid,
    campaign_uid: Uuid,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    invite_token: String,
    registered_at: Option<DateTime<Utc>>,
    reminder_sent_at: Option<DateTime<Utc>>,
    escalation_sent_at: Option<DateTime<Utc>>,
}

impl From<PendingInviteRaw> for PendingInvite {
    fn from(e: PendingInviteRaw) -> Self {
        Self {
            id: e.invite_uid.into(),
            campaign_id: e.campaign_uid.into(),
            email: e.email,
            first_name: e.first_name,
            last_name: e.last_name,
            invite_token: e.invite_token,
            registered_at: e.registered_at,
            reminder_sent_at: e.reminder_sent_at,
            escalation_sent_at: e.escalation_sent_at,
        }
    }
}

const SELECT_INVITES: &str = r#"
    SELECT invite_uid, campaign_uid, email, first_name, last_name, invite_token,
    registered_at, reminder_sent_at, escalation_sent_at
    FROM pending_invites
"#;

#[async_trait::async_trait]
impl IPendingInviteRepo for PostgresPendingInviteRepo {
    async fn insert(&self, invite: &PendingInvite) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pending_invites
            (invite_uid, campaign_uid, email, first_name, last_name, invite_token,
            registered_at, reminder_sent_at, escalation_sent_at)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(invite.id.inner_ref())
        .bind(invite.campaign_id.inner_ref())
        .bind(&invite.email)
        .bind(&invite.first_name)
        .bind(&invite.last_name)
        .bind(&invite.invite_token)
        .bind(invite.registered_at)
        .bind(invite.reminder_sent_at)
        .bind(invite.escalation_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert pending invite: {:?}. DB returned error: {:?}",
                invite, e
            );
            e
        })?;
        Ok(())
    }

    async fn save(&self, invite: &PendingInvite) -> anyhow::Result<()> {
        // Timestamps only ever move from null to a value
        let res = sqlx::query(
            r#"
            UPDATE pending_invites
            SET registered_at = COALESCE(registered_at, $2),
            reminder_sent_at = COALESCE(reminder_sent_at, $3),
            escalation_sent_at = COALESCE(escalation_sent_at, $4)
            WHERE invite_uid = $1
            "#,
        )
        .bind(invite.id.inner_ref())
        .bind(invite.registered_at)
        .bind(invite.reminder_sent_at)
        .bind(invite.escalation_sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save pending invite: {:?}. DB returned error: {:?}",
                invite, e
            );
            e
        })?;
        if res.rows_affected() == 0 {
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
        let query = format!(
            "UPDATE pending_invites SET {column} = COALESCE({column}, $2) WHERE invite_uid = $1",
            column = stage.marker_column()
        );
        let res = sqlx::query(&query)
            .bind(invite_id.inner_ref())
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to mark {:?} as sent for pending invite: {}. DB returned error: {:?}",
                    stage, invite_id, e
                );
                e
            })?;
        if res.rows_affected() == 0 {
            anyhow::bail!("Pending invite {} not found", invite_id);
        }
        Ok(())
    }

    async fn find(&self, invite_id: &ID) -> anyhow::Result<Option<PendingInvite>> {
        let query = format!("{} WHERE invite_uid = $1", SELECT_INVITES);
        let raw: Option<PendingInviteRaw> = sqlx::query_as(&query)
            .bind(invite_id.inner_ref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(raw.map(PendingInvite::from))
    }

    async fn find_by_campaign(&self, campaign_id: &ID) -> anyhow::Result<Vec<PendingInvite>> {
        let query = format!("{} WHERE campaign_uid = $1", SELECT_INVITES);
        let raws: Vec<PendingInviteRaw> = sqlx::query_as(&query)
            .bind(campaign_id.inner_ref())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Unable to list pending invites for campaign: {}. DB returned error: {:?}",
                    campaign_id, e
                );
                e
            })?;
        Ok(raws.into_iter().map(PendingInvite::from).collect())
    }
}
