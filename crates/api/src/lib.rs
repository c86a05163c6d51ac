mod attestation;
mod campaign;
mod error;
mod invite;
mod job_schedulers;
mod scheduler;
mod shared;

pub use error::SchedulerError;
pub use job_schedulers::AttestationJobScheduler;
pub use scheduler::run_scheduler::{
    auto_close_campaigns, process_escalations, process_reminders, process_unregistered_escalations,
    process_unregistered_reminders, run_scheduler,
};
pub use shared::dispatch_queue::{DispatchOutcome, DispatchQueue, DispatchSummary};
