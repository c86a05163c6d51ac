use crate::dtos::StageResult;
use serde::{Deserialize, Serialize};

pub mod run_scheduler {
    use super::*;

    /// Result of one full scheduler run, one entry per stage in execution order
    #[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub success: bool,
        pub reminders: StageResult,
        pub escalations: StageResult,
        pub unregistered_reminders: StageResult,
        pub unregistered_escalations: StageResult,
        pub auto_close: StageResult,
    }

    impl APIResponse {
        pub fn new(
            reminders: StageResult,
            escalations: StageResult,
            unregistered_reminders: StageResult,
            unregistered_escalations: StageResult,
            auto_close: StageResult,
        ) -> Self {
            let success = [
                &reminders,
                &escalations,
                &unregistered_reminders,
                &unregistered_escalations,
                &auto_close,
            ]
            .iter()
            .all(|stage| stage.success);
            Self {
                success,
                reminders,
                escalations,
                unregistered_reminders,
                unregistered_escalations,
                auto_close,
            }
        }

        /// Errors of all failed stages, prefixed with the stage name
        pub fn errors(&self) -> Vec<String> {
            [
                ("reminders", &self.reminders),
                ("escalations", &self.escalations),
                ("unregisteredReminders", &self.unregistered_reminders),
                ("unregisteredEscalations", &self.unregistered_escalations),
                ("autoClose", &self.auto_close),
            ]
            .iter()
            .filter_map(|(name, stage)| {
                stage
                    .error
                    .as_ref()
                    .map(|error| format!("{}: {}", name, error))
            })
            .collect()
        }
    }

}

/// Report of a full scheduler run
pub type SchedulerRunReport = run_scheduler::APIResponse;
