use serde::{Deserialize, Serialize};

/// Organisation wide single-sign-on settings, rendered into invite reminders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SsoConfig {
    pub enabled: bool,
    pub button_label: Option<String>,
}
