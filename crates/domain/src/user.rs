use crate::pending_invite::display_name;
use crate::shared::entity::{Entity, ID};
use serde::{Deserialize, Serialize};

/// A registered platform user as seen by the user directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: ID,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub manager_email: Option<String>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Default::default(),
            email: Some(email.into()),
            first_name: None,
            last_name: None,
            manager_email: None,
        }
    }

    /// The email to notify, if it is usable
    pub fn contact_email(&self) -> Option<&str> {
        non_empty(self.email.as_deref())
    }

    pub fn manager_contact_email(&self) -> Option<&str> {
        non_empty(self.manager_email.as_deref())
    }

    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            self.contact_email().unwrap_or_default(),
        )
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
