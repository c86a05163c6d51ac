mod config;
mod repos;
mod services;
mod system;

pub use config::{parse_bool, Config, NotificationWebhookConfig};
pub use repos::*;
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use attestation_scheduler_domain::SsoConfig;
use tracing::warn;

#[derive(Clone)]
pub struct AttestationContext {
    pub repos: Repos,
    pub services: Services,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl AttestationContext {
    /// Context backed by in-memory stores and a logging notification gateway
    pub fn create_inmemory() -> Self {
        let config = Config::default();
        Self {
            repos: Repos::create_inmemory(),
            services: Services {
                notifications: Arc::new(LogNotificationGateway {}),
                sso: Arc::new(StaticSsoConfigProvider::new(sso_config(&config))),
            },
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    async fn create(config: Config, database_url: Option<String>) -> anyhow::Result<Self> {
        let repos = match database_url {
            Some(url) => Repos::create_postgres(&url).await?,
            None => {
                warn!("DATABASE_URL is not set. Falling back to in-memory stores.");
                Repos::create_inmemory()
            }
        };

        let notifications: Arc<dyn INotificationGateway> = match &config.notification_webhook {
            Some(webhook) => Arc::new(WebhookNotificationGateway::new(
                webhook,
                config.notification_timeout,
            )?),
            None => {
                warn!("NOTIFICATION_WEBHOOK_URL is not set. Notifications will only be logged.");
                Arc::new(LogNotificationGateway {})
            }
        };
        let sso = Arc::new(StaticSsoConfigProvider::new(sso_config(&config)));

        Ok(Self {
            repos,
            services: Services { notifications, sso },
            config,
            sys: Arc::new(RealSys {}),
        })
    }
}

fn sso_config(config: &Config) -> SsoConfig {
    SsoConfig {
        enabled: config.sso_enabled,
        button_label: config.sso_button_label.clone(),
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<AttestationContext> {
    AttestationContext::create(Config::new(), std::env::var("DATABASE_URL").ok()).await
}
