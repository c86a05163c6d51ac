use super::IAssetRepo;
use attestation_scheduler_domain::Asset;
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresAssetRepo {
    pool: PgPool,
}

impl PostgresAssetRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AssetRaw {
    asset_uid: Uuid,
    name: String,
    employee_email: String,
    manager_email: Option<String>,
}

impl From<AssetRaw> for Asset {
    fn from(e: AssetRaw) -> Self {
        Self {
            id: e.asset_uid.into(),
            name: e.name,
            employee_email: e.employee_email,
            manager_email: e.manager_email,
        }
    }
}

#[async_trait::async_trait]
impl IAssetRepo for PostgresAssetRepo {
    async fn insert(&self, asset: &Asset) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO assets(asset_uid, name, employee_email, manager_email)
            VALUES($1, $2, $3, $4)
            "#,
        )
        .bind(asset.id.inner_ref())
        .bind(&asset.name)
        .bind(&asset.employee_email)
        .bind(&asset.manager_email)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert asset: {:?}. DB returned error: {:?}",
                asset, e
            );
            e
        })?;
        Ok(())
    }

    async fn find_by_employee_email(&self, email: &str) -> anyhow::Result<Vec<Asset>> {
        let raws: Vec<AssetRaw> = sqlx::query_as(
            r#"
            SELECT asset_uid, name, employee_email, manager_email
            FROM assets
            WHERE LOWER(employee_email) = LOWER($1)
            ORDER BY asset_uid
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to find assets for employee: {}. DB returned error: {:?}",
                email, e
            );
            e
        })?;
        Ok(raws.into_iter().map(Asset::from).collect())
    }
}
