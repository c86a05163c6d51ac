mod notification;
mod sso;

pub use notification::{
    INotificationGateway, InMemoryNotificationGateway, LogNotificationGateway, SentNotification,
    WebhookNotificationGateway,
};
pub use sso::{ISsoConfigProvider, StaticSsoConfigProvider};
use std::sync::Arc;

#[derive(Clone)]
pub struct Services {
    pub notifications: Arc<dyn INotificationGateway>,
    pub sso: Arc<dyn ISsoConfigProvider>,
}
