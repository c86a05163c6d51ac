use crate::attestation::{
    process_escalations::ProcessEscalationsUseCase, process_reminders::ProcessRemindersUseCase,
};
use crate::campaign::auto_close_campaigns::AutoCloseCampaignsUseCase;
use crate::error::SchedulerError;
use crate::invite::{
    process_unregistered_escalations::ProcessUnregisteredEscalationsUseCase,
    process_unregistered_reminders::ProcessUnregisteredRemindersUseCase,
};
use crate::shared::usecase::{execute, UseCase};
use attestation_scheduler_api_structs::dtos::StageResult;
use attestation_scheduler_api_structs::run_scheduler::APIResponse;
use attestation_scheduler_infra::AttestationContext;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{error, info};

pub async fn process_reminders(ctx: &AttestationContext) -> StageResult {
    run_stage(ProcessRemindersUseCase::default(), ctx).await
}

pub async fn process_escalations(ctx: &AttestationContext) -> StageResult {
    run_stage(ProcessEscalationsUseCase::default(), ctx).await
}

pub async fn process_unregistered_reminders(ctx: &AttestationContext) -> StageResult {
    run_stage(ProcessUnregisteredRemindersUseCase::default(), ctx).await
}

pub async fn process_unregistered_escalations(ctx: &AttestationContext) -> StageResult {
    run_stage(ProcessUnregisteredEscalationsUseCase::default(), ctx).await
}

pub async fn auto_close_campaigns(ctx: &AttestationContext) -> StageResult {
    run_stage(AutoCloseCampaignsUseCase::default(), ctx).await
}

/// Runs every stage once, in order. Campaigns are closed last so that a
/// campaign reaching both its escalation threshold and its end date in the same
/// run still gets its escalations.
///
/// A failing stage is reported in the response and never prevents the stages
/// after it from running.
#[tracing::instrument(name = "Scheduler run", skip(ctx))]
pub async fn run_scheduler(ctx: &AttestationContext) -> APIResponse {
    let reminders = process_reminders(ctx).await;
    let escalations = process_escalations(ctx).await;
    let unregistered_reminders = process_unregistered_reminders(ctx).await;
    let unregistered_escalations = process_unregistered_escalations(ctx).await;
    let auto_close = auto_close_campaigns(ctx).await;

    let report = APIResponse::new(
        reminders,
        escalations,
        unregistered_reminders,
        unregistered_escalations,
        auto_close,
    );
    if report.success {
        info!("Scheduler run completed");
    } else {
        error!("Scheduler run completed with failures: {:?}", report.errors());
    }
    report
}

async fn run_stage<U>(usecase: U, ctx: &AttestationContext) -> StageResult
where
    U: UseCase,
    SchedulerError: From<U::Error>,
{
    match AssertUnwindSafe(execute(usecase, ctx)).catch_unwind().await {
        Ok(Ok(res)) => {
            info!("{} finished: {:?}", U::NAME, res);
            StageResult::ok()
        }
        Ok(Err(e)) => StageResult::failed(SchedulerError::from(e).to_string()),
        Err(panic) => {
            let e = SchedulerError::Panicked(U::NAME, panic_message(panic.as_ref()));
            error!("{}", e);
            StageResult::failed(e.to_string())
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".into()
    }
}
