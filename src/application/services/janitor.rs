use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ArtifactStore, DeleteOutcome};
use crate::domain::Artifact;

pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(3600);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub already_gone: usize,
    pub failed: usize,
}

/// Background sweep that reclaims artifacts whose owners never cleaned up.
pub struct Janitor {
    store: Arc<dyn ArtifactStore>,
    interval: Duration,
    max_age: Duration,
}

impl Janitor {
    pub fn new(store: Arc<dyn ArtifactStore>, interval: Duration, max_age: Duration) -> Self {
        Self {
            store,
            interval,
            max_age,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Sweeps immediately, then once per interval until cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_age_secs = self.max_age.as_secs(),
            "Janitor started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    self.sweep().await;
                }
            }
        }
        tracing::info!("Janitor stopped");
    }

    pub async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        let stale = match self.store.stale_files(self.max_age).await {
            Ok(stale) => stale,
            Err(e) => {
                tracing::error!(error = %e, "Janitor could not scan working directory");
                return report;
            }
        };

        for file in stale {
            report.scanned += 1;
            let artifact = Artifact::recovered(file.path, file.age);
            match self.store.delete(&artifact).await {
                DeleteOutcome::Removed => report.deleted += 1,
                DeleteOutcome::AlreadyGone => report.already_gone += 1,
                DeleteOutcome::GaveUp => report.failed += 1,
            }
        }

        if report.scanned > 0 {
            tracing::info!(
                scanned = report.scanned,
                deleted = report.deleted,
                failed = report.failed,
                "Janitor sweep finished"
            );
        } else {
            tracing::debug!("Janitor sweep found nothing stale");
        }
        report
    }
}
