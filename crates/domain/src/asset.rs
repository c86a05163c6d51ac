use crate::shared::entity::{Entity, ID};
use crate::user::non_empty;
use serde::{Deserialize, Serialize};

/// An asset as recorded in the asset directory. Ownership is keyed on the
/// employee email so that assets can be tracked before their owner registers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: ID,
    pub name: String,
    pub employee_email: String,
    pub manager_email: Option<String>,
}

impl Asset {
    pub fn new(name: impl Into<String>, employee_email: impl Into<String>) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            employee_email: employee_email.into(),
            manager_email: None,
        }
    }
}

impl Entity for Asset {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerResolution {
    Found(String),
    NoAssets,
    NoManager,
    /// The employee's assets disagree about who the manager is
    ConflictingManagers(Vec<String>),
}

/// All assets currently owned by one employee
#[derive(Debug, Clone)]
pub struct EmployeeAssets {
    pub employee_email: String,
    pub assets: Vec<Asset>,
}

impl EmployeeAssets {
    pub fn new(employee_email: impl Into<String>, assets: Vec<Asset>) -> Self {
        Self {
            employee_email: employee_email.into(),
            assets,
        }
    }

    pub fn count(&self) -> usize {
        self.assets.len()
    }

    /// Every asset of an employee is expected to name the same manager. Blank
    /// manager fields are ignored and emails are compared case-insensitively.
    pub fn manager(&self) -> ManagerResolution {
        if self.assets.is_empty() {
            return ManagerResolution::NoAssets;
        }

        let mut managers: Vec<String> = Vec::new();
        for asset in &self.assets {
            if let Some(manager) = non_empty(asset.manager_email.as_deref()) {
                if !managers.iter().any(|m| m.eq_ignore_ascii_case(manager)) {
                    managers.push(manager.to_string());
                }
            }
        }

        match managers.len() {
            0 => ManagerResolution::NoManager,
            1 => ManagerResolution::Found(managers.remove(0)),
            _ => ManagerResolution::ConflictingManagers(managers),
        }
    }
}
