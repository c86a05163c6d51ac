mod inmemory;
mod postgres;

use attestation_scheduler_domain::{Asset, EmployeeAssets};
pub use inmemory::InMemoryAssetRepo;
pub use postgres::PostgresAssetRepo;

/// Read access to the asset directory
#[async_trait::async_trait]
pub trait IAssetRepo: Send + Sync {
    async fn insert(&self, asset: &Asset) -> anyhow::Result<()>;
    /// Matches the employee email case-insensitively
    async fn find_by_employee_email(&self, email: &str) -> anyhow::Result<Vec<Asset>>;

    async fn find_employee_assets(&self, email: &str) -> anyhow::Result<EmployeeAssets> {
        let assets = self.find_by_employee_email(email).await?;
        Ok(EmployeeAssets::new(email, assets))
    }
}
