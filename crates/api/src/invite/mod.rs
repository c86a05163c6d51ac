pub mod process_unregistered_escalations;
pub mod process_unregistered_reminders;
