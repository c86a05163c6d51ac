use crate::notification::NotificationStage;
use crate::shared::entity::{Entity, ID};
use crate::shared::status::UnknownStatusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationStatus {
    Pending,
    Completed,
}

impl AttestationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for AttestationStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

/// Tracks one registered `User` taking part in one `Campaign`.
///
/// `reminder_sent_at` and `escalation_sent_at` are send-once markers: once set
/// they are never cleared or overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttestationRecord {
    pub id: ID,
    pub campaign_id: ID,
    pub user_id: ID,
    pub status: AttestationStatus,
    pub reminder_sent_at: Option<DateTime<Utc>>,
    pub escalation_sent_at: Option<DateTime<Utc>>,
}

impl AttestationRecord {
    pub fn new(campaign_id: ID, user_id: ID) -> Self {
        Self {
            id: Default::default(),
            campaign_id,
            user_id,
            status: AttestationStatus::Pending,
            reminder_sent_at: None,
            escalation_sent_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == AttestationStatus::Pending
    }

    pub fn needs_reminder(&self) -> bool {
        self.is_pending() && self.reminder_sent_at.is_none()
    }

    pub fn needs_escalation(&self) -> bool {
        self.is_pending() && self.escalation_sent_at.is_none()
    }

    /// Returns false if the marker was already set, in which case it is left untouched
    pub fn mark_reminder_sent(&mut self, at: DateTime<Utc>) -> bool {
        set_once(&mut self.reminder_sent_at, at)
    }

    /// Returns false if the marker was already set, in which case it is left untouched
    pub fn mark_escalation_sent(&mut self, at: DateTime<Utc>) -> bool {
        set_once(&mut self.escalation_sent_at, at)
    }

    pub fn mark_sent(&mut self, stage: NotificationStage, at: DateTime<Utc>) -> bool {
        match stage {
            NotificationStage::Reminder => self.mark_reminder_sent(at),
            NotificationStage::Escalation => self.mark_escalation_sent(at),
        }
    }
}

pub(crate) fn set_once(marker: &mut Option<DateTime<Utc>>, at: DateTime<Utc>) -> bool {
    if marker.is_some() {
        return false;
    }
    *marker = Some(at);
    true
}

impl Entity for AttestationRecord {
    fn id(&self) -> &ID {
        &self.id
    }
}
