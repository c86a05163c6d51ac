use attestation_scheduler_domain::SsoConfig;

/// Source of the organisation's current single-sign-on settings
#[async_trait::async_trait]
pub trait ISsoConfigProvider: Send + Sync {
    async fn get_config(&self) -> anyhow::Result<SsoConfig>;
}

/// Serves the SSO settings given at startup
pub struct StaticSsoConfigProvider {
    config: SsoConfig,
}

impl StaticSsoConfigProvider {
    pub fn new(config: SsoConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl ISsoConfigProvider for StaticSsoConfigProvider {
    async fn get_config(&self) -> anyhow::Result<SsoConfig> {
        Ok(self.config.clone())
    }
}
