use futures::stream::{self, StreamExt};
use std::future::Future;
use std::ops::AddAssign;

/// What happened to a single participant in a dispatch stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Notification delivered and the send-once marker persisted
    Sent,
    /// Nothing to do for this participant, e.g. no reachable recipient
    Skipped,
    /// Delivery or marker persistence failed. The participant is retried next run.
    Failed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl DispatchSummary {
    pub fn record(&mut self, outcome: DispatchOutcome) {
        match outcome {
            DispatchOutcome::Sent => self.sent += 1,
            DispatchOutcome::Skipped => self.skipped += 1,
            DispatchOutcome::Failed => self.failed += 1,
        }
    }
}

impl AddAssign for DispatchSummary {
    fn add_assign(&mut self, other: Self) {
        self.sent += other.sent;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Runs per-participant dispatch jobs with at most `concurrency` of them in flight.
///
/// Every job resolves to a `DispatchOutcome`, so one failing participant can never
/// cancel or hide its siblings.
#[derive(Debug, Clone, Copy)]
pub struct DispatchQueue {
    concurrency: usize,
}

impl DispatchQueue {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub async fn run<I, F>(&self, jobs: I) -> DispatchSummary
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = DispatchOutcome>,
    {
        stream::iter(jobs)
            .buffer_unordered(self.concurrency)
            .fold(DispatchSummary::default(), |mut summary, outcome| async move {
                summary.record(outcome);
                summary
            })
            .await
    }
}
