//! Scheduler loop
//!
//! Runs a reconciliation pass immediately and then once per interval until
//! cancelled. A failed pass is logged and the loop keeps going.

use super::reconcile_stages::{ReconcileReport, ReconcileStagesUseCase};
use crate::config::SchedulerConfig;
use crate::ports::decision_repository::DecisionRepository;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub struct StageScheduler<R: DecisionRepository + 'static> {
    reconcile: ReconcileStagesUseCase<R>,
    cancellation_token: CancellationToken,
}

impl<R: DecisionRepository + 'static> StageScheduler<R> {
    pub fn new(reconcile: ReconcileStagesUseCase<R>, cancellation_token: CancellationToken) -> Self {
        Self {
            reconcile,
            cancellation_token,
        }
    }

    /// Run until cancelled, returning the number of completed passes
    pub async fn run(&self) -> usize {
        self.run_with(|_| {}).await
    }

    /// Like [`run`](Self::run), handing every pass report to `on_pass`
    pub async fn run_with<F>(&self, mut on_pass: F) -> usize
    where
        F: FnMut(&ReconcileReport),
    {
        let mut period = self.reconcile.config().interval;
        if period.is_zero() {
            period = SchedulerConfig::default().interval;
            warn!("Zero scheduler interval, falling back to {:?}", period);
        }
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Stage scheduler started (every {:?})", period);

        let mut passes = 0;
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            match self.reconcile.execute().await {
                Ok(report) => {
                    passes += 1;
                    on_pass(&report);
                }
                Err(e) => warn!("Reconciliation pass failed: {}", e),
            }
        }

        info!("Stage scheduler stopped after {} pass(es)", passes);
        passes
    }
}
