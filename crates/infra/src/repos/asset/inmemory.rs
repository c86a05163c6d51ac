use super::IAssetRepo;
use crate::repos::shared::inmemory_repo::*;
use attestation_scheduler_domain::Asset;

pub struct InMemoryAssetRepo {
    assets: std::sync::Mutex<Vec<Asset>>,
}

impl InMemoryAssetRepo {
    pub fn new() -> Self {
        Self {
            assets: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl IAssetRepo for InMemoryAssetRepo {
    async fn insert(&self, asset: &Asset) -> anyhow::Result<()> {
        insert(asset, &self.assets);
        Ok(())
    }

    async fn find_by_employee_email(&self, email: &str) -> anyhow::Result<Vec<Asset>> {
        Ok(find_by(&self.assets, |a| {
            a.employee_email.eq_ignore_ascii_case(email)
        }))
    }
}
