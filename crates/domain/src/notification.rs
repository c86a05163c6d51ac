use crate::shared::entity::ID;
use crate::sso::SsoConfig;
use crate::Campaign;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two notifications each participant can receive, one send-once marker each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStage {
    Reminder,
    Escalation,
}

impl NotificationStage {
    /// Column holding the stage's send-once marker
    pub fn marker_column(&self) -> &'static str {
        match self {
            Self::Reminder => "reminder_sent_at",
            Self::Escalation => "escalation_sent_at",
        }
    }
}

/// Outcome of a single send as reported by the notification gateway. It is only
/// used to decide whether a send-once marker should be set.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationResult {
    pub success: bool,
    pub error: Option<String>,
}

impl NotificationResult {
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// The `Campaign` fields a notification template needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignContext {
    pub campaign_id: ID,
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<&Campaign> for CampaignContext {
    fn from(campaign: &Campaign) -> Self {
        Self {
            campaign_id: campaign.id,
            name: campaign.name.clone(),
            start_date: campaign.start_date,
            end_date: campaign.end_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNotification {
    pub to: String,
    pub recipient_name: String,
    pub campaign: CampaignContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationNotification {
    /// The manager of the employee
    pub to: String,
    pub employee_name: String,
    pub employee_email: String,
    pub campaign: CampaignContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisteredReminderNotification {
    pub to: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invite_token: String,
    pub asset_count: usize,
    pub sso: SsoConfig,
    pub campaign: CampaignContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnregisteredEscalationNotification {
    /// The manager of the invitee
    pub to: String,
    pub invitee_name: String,
    pub invitee_email: String,
    pub asset_count: usize,
    pub campaign: CampaignContext,
}
