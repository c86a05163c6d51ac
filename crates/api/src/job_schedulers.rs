use crate::scheduler::run_scheduler::run_scheduler;
use attestation_scheduler_infra::AttestationContext;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, info_span};
use tracing_futures::Instrument;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

struct RunningJob {
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Owns the recurring scheduler run.
///
/// Nothing happens until `start` is called. The first run happens one full
/// interval after `start`, and then once every interval until `stop` is called
/// or the scheduler is dropped.
pub struct AttestationJobScheduler {
    ctx: AttestationContext,
    interval: Duration,
    completed_runs: Arc<AtomicU64>,
    job: Option<RunningJob>,
}

impl AttestationJobScheduler {
    pub fn new(ctx: AttestationContext) -> Self {
        let interval = ctx.config.scheduler_interval;
        Self {
            ctx,
            interval,
            completed_runs: Arc::new(AtomicU64::new(0)),
            job: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Spawns the recurring job. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        let period = self.interval.max(MIN_INTERVAL);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(
            run_periodically(
                self.ctx.clone(),
                period,
                self.completed_runs.clone(),
                shutdown_rx,
            )
            .instrument(info_span!("attestation_job_scheduler")),
        );
        info!("Attestation scheduler armed with an interval of {:?}", period);

        self.job = Some(RunningJob {
            shutdown_tx,
            handle,
        });
        true
    }

    /// Stops the job. A run in progress is allowed to finish first.
    pub async fn stop(&mut self) {
        if let Some(job) = self.job.take() {
            let _ = job.shutdown_tx.send(true);
            if let Err(e) = job.handle.await {
                error!("Attestation scheduler job ended abnormally: {:?}", e);
            }
            info!("Attestation scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(&self.job, Some(job) if !job.handle.is_finished())
    }

    pub fn completed_runs(&self) -> u64 {
        self.completed_runs.load(Ordering::SeqCst)
    }
}

impl Drop for AttestationJobScheduler {
    fn drop(&mut self) {
        if let Some(job) = &self.job {
            let _ = job.shutdown_tx.send(true);
        }
    }
}

async fn run_periodically(
    ctx: AttestationContext,
    period: Duration,
    completed_runs: Arc<AtomicU64>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                run_scheduler(&ctx).await;
                completed_runs.fetch_add(1, Ordering::SeqCst);
            }
            _ = shutdown_rx.changed() => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_utils::setup;
    use attestation_scheduler_domain::{AttestationRecord, User};
    use tokio::time::sleep;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    #[tokio::test(start_paused = true)]
    async fn runs_once_per_interval_until_stopped() {
        let test = setup();
        let mut scheduler = AttestationJobScheduler::new(test.ctx.clone()).with_interval(HOUR);
        assert!(!scheduler.is_running());
        assert!(scheduler.start());
        assert!(!scheduler.start());
        assert!(scheduler.is_running());

        sleep(HOUR - Duration::from_secs(1)).await;
        assert_eq!(scheduler.completed_runs(), 0);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(scheduler.completed_runs(), 1);

        sleep(HOUR * 2).await;
        assert_eq!(scheduler.completed_runs(), 3);

        scheduler.stop().await;
        assert!(!scheduler.is_running());
        sleep(HOUR * 5).await;
        assert_eq!(scheduler.completed_runs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_run_dispatches_notifications() {
        let test = setup();
        let campaign = test.insert_campaign(10).await;
        let user = User::new("kari@example.com");
        test.ctx.repos.users.insert(&user).await.unwrap();
        test.ctx
            .repos
            .attestation_records
            .insert(&AttestationRecord::new(campaign.id, user.id))
            .await
            .unwrap();

        let mut scheduler = AttestationJobScheduler::new(test.ctx.clone()).with_interval(HOUR);
        scheduler.start();
        assert!(test.notifications.attempts().is_empty());

        sleep(HOUR + Duration::from_secs(1)).await;
        assert_eq!(test.notifications.delivered_to("kari@example.com").len(), 1);

        sleep(HOUR).await;
        assert_eq!(scheduler.completed_runs(), 2);
        assert_eq!(test.notifications.attempts().len(), 1);
        scheduler.stop().await;
    }

    #[tokio::test]
    async fn stop_without_start_is_a_noop() {
        let test = setup();
        let mut scheduler = AttestationJobScheduler::new(test.ctx.clone());
        scheduler.stop().await;
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.completed_runs(), 0);
    }
}
