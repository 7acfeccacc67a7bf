//! Repeats reconciliation passes on a fixed interval.

use crate::sync::{self, Pass};
use log::{error, info, warn};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug)]
pub enum Error {
    /// A store rejected its credentials. Passes cannot succeed until they are fixed.
    #[error("Stopped after a fatal sync failure: {0}")]
    Fatal(#[source] sync::Error),
}

/// Runs one pass, waits `interval`, and repeats until cancelled.
///
/// Passes never overlap and each starts from a fresh snapshot. Cancellation
/// is observed between passes, not during one.
pub struct Scheduler {
    interval: Duration,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(interval: Duration, cancel: CancellationToken) -> Self {
        Self { interval, cancel }
    }

    pub async fn run<P: Pass>(&self, pass: &P) -> Result<(), Error> {
        info!(
            "Scheduler started, syncing every {}s",
            self.interval.as_secs()
        );
        while !self.cancel.is_cancelled() {
            info!("Starting sync at {}", chrono::Local::now().to_rfc2822());
            match pass.run_pass().await {
                Ok(summary) => info!(
                    "Sync complete ({}). Waiting {}s",
                    summary,
                    self.interval.as_secs()
                ),
                Err(e) if e.is_transient() => {
                    warn!(
                        "Error during sync, retrying in {}s: {}",
                        self.interval.as_secs(),
                        e
                    )
                }
                Err(e) if e.is_fatal() => {
                    error!("Fatal error during sync: {}", e);
                    return Err(Error::Fatal(e));
                }
                Err(e) => error!(
                    "Sync failed, retrying in {}s: {}",
                    self.interval.as_secs(),
                    e
                ),
            }

            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
        info!("Scheduler stopped");
        Ok(())
    }
}
