use crate::date::has_crossed_threshold;
use crate::shared::entity::{Entity, ID};
use crate::shared::status::UnknownStatusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Reminder threshold for not yet registered invitees when the `Campaign`
/// does not configure one.
pub const DEFAULT_UNREGISTERED_REMINDER_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownStatusError(other.to_string())),
        }
    }
}

/// A time-boxed attestation exercise. Covered asset owners are tracked either as
/// `AttestationRecord`s (registered users) or `PendingInvite`s (no account yet).
///
/// `Campaign`s are created and edited elsewhere; the scheduler only ever moves
/// an `Active` campaign to `Completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: ID,
    pub name: String,
    pub status: CampaignStatus,
    /// `None` when the campaign was stored without a usable start date. Such a
    /// campaign never becomes due for any notification.
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub reminder_days: i64,
    pub escalation_days: i64,
    pub unregistered_reminder_days: Option<i64>,
}

impl Campaign {
    pub fn new(name: impl Into<String>, start_date: DateTime<Utc>) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            status: CampaignStatus::Active,
            start_date: Some(start_date),
            end_date: None,
            reminder_days: 7,
            escalation_days: 14,
            unregistered_reminder_days: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CampaignStatus::Active
    }

    /// The threshold used for the unregistered reminder track.
    ///
    /// An unset value falls back to `DEFAULT_UNREGISTERED_REMINDER_DAYS`. A configured
    /// `0` is kept as `0`, i.e. the reminder is due as soon as the campaign starts.
    pub fn resolved_unregistered_reminder_days(&self) -> i64 {
        self.unregistered_reminder_days
            .unwrap_or(DEFAULT_UNREGISTERED_REMINDER_DAYS)
    }

    pub fn is_reminder_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && has_crossed_threshold(self.start_date, self.reminder_days, now)
    }

    pub fn is_escalation_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && has_crossed_threshold(self.start_date, self.escalation_days, now)
    }

    pub fn is_unregistered_reminder_due(&self, now: DateTime<Utc>) -> bool {
        self.is_active()
            && has_crossed_threshold(
                self.start_date,
                self.resolved_unregistered_reminder_days(),
                now,
            )
    }

    /// The unregistered track shares its escalation threshold with the registered track
    pub fn is_unregistered_escalation_due(&self, now: DateTime<Utc>) -> bool {
        self.is_escalation_due(now)
    }

    /// Active campaigns whose end date lies strictly before `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && matches!(self.end_date, Some(end) if end < now)
    }

    /// Terminal transition. Returns false if the campaign was not active and
    /// therefore left unchanged.
    pub fn complete(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = CampaignStatus::Completed;
        true
    }
}

impl Entity for Campaign {
    fn id(&self) -> &ID {
        &self.id
    }
}
