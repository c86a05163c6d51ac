use crate::attestation_record::set_once;
use crate::notification::NotificationStage;
use crate::shared::entity::{Entity, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An asset owner covered by a `Campaign` who has no account yet.
///
/// Once `registered_at` is set by the registration flow the invite leaves both
/// unregistered notification tracks for good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingInvite {
    pub id: ID,
    pub campaign_id: ID,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invite_token: String,
    pub registered_at: Option<DateTime<Utc>>,
    pub reminder_sent_at: Option<DateTime<Utc>>,
    pub escalation_sent_at: Option<DateTime<Utc>>,
}

impl PendingInvite {
    pub fn new(campaign_id: ID, email: impl Into<String>, invite_token: impl Into<String>) -> Self {
        Self {
            id: Default::default(),
            campaign_id,
            email: email.into(),
            first_name: None,
            last_name: None,
            invite_token: invite_token.into(),
            registered_at: None,
            reminder_sent_at: None,
            escalation_sent_at: None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered_at.is_some()
    }

    pub fn needs_reminder(&self) -> bool {
        !self.is_registered() && self.reminder_sent_at.is_none()
    }

    pub fn needs_escalation(&self) -> bool {
        !self.is_registered() && self.escalation_sent_at.is_none()
    }

    pub fn mark_reminder_sent(&mut self, at: DateTime<Utc>) -> bool {
        set_once(&mut self.reminder_sent_at, at)
    }

    pub fn mark_escalation_sent(&mut self, at: DateTime<Utc>) -> bool {
        set_once(&mut self.escalation_sent_at, at)
    }

    pub fn mark_sent(&mut self, stage: NotificationStage, at: DateTime<Utc>) -> bool {
        match stage {
            NotificationStage::Reminder => self.mark_reminder_sent(at),
            NotificationStage::Escalation => self.mark_escalation_sent(at),
        }
    }

    /// "First Last", falling back to whichever part is present and then to the email
    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.email,
        )
    }
}

pub(crate) fn display_name(first: Option<&str>, last: Option<&str>, fallback: &str) -> String {
    let parts = [first, last]
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>();
    if parts.is_empty() {
        fallback.to_string()
    } else {
        parts.join(" ")
    }
}

impl Entity for PendingInvite {
    fn id(&self) -> &ID {
        &self.id
    }
}
