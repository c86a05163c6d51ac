pub mod process_escalations;
pub mod process_reminders;
