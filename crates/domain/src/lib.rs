mod asset;
mod attestation_record;
mod campaign;
mod date;
mod notification;
mod pending_invite;
mod shared;
mod sso;
mod user;

pub use asset::{Asset, EmployeeAssets, ManagerResolution};
pub use attestation_record::{AttestationRecord, AttestationStatus};
pub use campaign::{Campaign, CampaignStatus, DEFAULT_UNREGISTERED_REMINDER_DAYS};
pub use date::{has_crossed_threshold, whole_days_between};
pub use notification::{
    CampaignContext, EscalationNotification, NotificationResult, NotificationStage,
    ReminderNotification, UnregisteredEscalationNotification, UnregisteredReminderNotification,
};
pub use pending_invite::PendingInvite;
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::status::UnknownStatusError;
pub use sso::SsoConfig;
pub use user::User;
