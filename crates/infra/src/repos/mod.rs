mod asset;
mod attestation_record;
mod campaign;
mod pending_invite;
mod shared;
mod user;

pub use asset::{IAssetRepo, InMemoryAssetRepo, PostgresAssetRepo};
pub use attestation_record::{
    IAttestationRecordRepo, InMemoryAttestationRecordRepo, PostgresAttestationRecordRepo,
};
pub use campaign::{ICampaignRepo, InMemoryCampaignRepo, PostgresCampaignRepo};
pub use pending_invite::{IPendingInviteRepo, InMemoryPendingInviteRepo, PostgresPendingInviteRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
pub use user::{IUserRepo, InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub campaigns: Arc<dyn ICampaignRepo>,
    pub attestation_records: Arc<dyn IAttestationRecordRepo>,
    pub pending_invites: Arc<dyn IPendingInviteRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub assets: Arc<dyn IAssetRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");
        sqlx::migrate!().run(&pool).await?;
        Ok(Self {
            campaigns: Arc::new(PostgresCampaignRepo::new(pool.clone())),
            attestation_records: Arc::new(PostgresAttestationRecordRepo::new(pool.clone())),
            pending_invites: Arc::new(PostgresPendingInviteRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            assets: Arc::new(PostgresAssetRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            campaigns: Arc::new(InMemoryCampaignRepo::new()),
            attestation_records: Arc::new(InMemoryAttestationRecordRepo::new()),
            pending_invites: Arc::new(InMemoryPendingInviteRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            assets: Arc::new(InMemoryAssetRepo::new()),
        }
    }
}
