use std::time::Duration;
use tracing::{info, warn};

const DEFAULT_INTERVAL_SECS: u64 = 60 * 60 * 24;
const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DISPATCH_CONCURRENCY: usize = 1;

#[derive(Debug, Clone)]
pub struct Config {
    /// Whether the recurring scheduler timer should be armed at startup.
    /// When false the scheduler only runs when invoked explicitly.
    pub scheduler_enabled: bool,
    /// Time between two scheduler runs
    pub scheduler_interval: Duration,
    /// How many notifications a single stage may have in flight at once.
    /// `1` processes participants one by one.
    pub dispatch_concurrency: usize,
    /// Endpoint receiving notifications. Without it notifications are only logged.
    pub notification_webhook: Option<NotificationWebhookConfig>,
    /// Upper bound for a single call to the notification gateway
    pub notification_timeout: Duration,
    pub sso_enabled: bool,
    pub sso_button_label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotificationWebhookConfig {
    pub url: String,
    pub key: String,
}

impl Config {
    pub fn new() -> Self {
        let scheduler_enabled = std::env::var("ATTESTATION_SCHEDULER_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);
        if !scheduler_enabled {
            info!("ATTESTATION_SCHEDULER_ENABLED is not set. The scheduler will only run when invoked.");
        }

        let scheduler_interval = Duration::from_secs(parse_env_or(
            "ATTESTATION_SCHEDULER_INTERVAL_SECS",
            DEFAULT_INTERVAL_SECS,
        ));
        let dispatch_concurrency =
            parse_env_or("ATTESTATION_DISPATCH_CONCURRENCY", DEFAULT_DISPATCH_CONCURRENCY).max(1);
        let notification_timeout = Duration::from_secs(parse_env_or(
            "NOTIFICATION_TIMEOUT_SECS",
            DEFAULT_NOTIFICATION_TIMEOUT_SECS,
        ));

        let notification_webhook = match std::env::var("NOTIFICATION_WEBHOOK_URL") {
            Ok(url) if is_valid_webhook_url(&url) => Some(NotificationWebhookConfig {
                url,
                key: std::env::var("NOTIFICATION_WEBHOOK_KEY").unwrap_or_default(),
            }),
            Ok(url) => {
                warn!(
                    "The given NOTIFICATION_WEBHOOK_URL: {} is not a valid http(s) url, notifications will only be logged.",
                    url
                );
                None
            }
            Err(_) => None,
        };

        let sso_enabled = std::env::var("SSO_ENABLED")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);
        let sso_button_label = std::env::var("SSO_BUTTON_LABEL")
            .ok()
            .filter(|label| !label.trim().is_empty());

        Self {
            scheduler_enabled,
            scheduler_interval,
            dispatch_concurrency,
            notification_webhook,
            notification_timeout,
            sso_enabled,
            sso_button_label,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler_enabled: false,
            scheduler_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            dispatch_concurrency: DEFAULT_DISPATCH_CONCURRENCY,
            notification_webhook: None,
            notification_timeout: Duration::from_secs(DEFAULT_NOTIFICATION_TIMEOUT_SECS),
            sso_enabled: false,
            sso_button_label: None,
        }
    }
}

pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

fn parse_env_or<T: std::str::FromStr + std::fmt::Display + Copy>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(value) => match value.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

fn is_valid_webhook_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed_url) => ["https", "http"].contains(&parsed_url.scheme()),
        Err(_) => false,
    }
}
