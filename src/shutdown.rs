//! Graceful teardown sequence.
//!
//! Every exit path converges here: user interrupt, startup failure, and
//! faults from the dispatch loop. The sequence stops scanning, disconnects
//! devices, closes the session, logs out and closes the output file. The
//! stop-scan/disconnect step is retried a bounded number of times so a
//! struggling gateway cannot hang the shutdown.

use crate::gateway::{GatewayError, GatewaySession};
use crate::output::csv::CsvSink;
use crate::scan::{ScanMode, ScanSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Retry attempts for the stop-scan/disconnect step.
const TEARDOWN_RETRIES: u32 = 3;
/// Delay between teardown retry attempts.
const TEARDOWN_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Runs the teardown sequence exactly once per process.
pub struct ShutdownController {
    gateway: Arc<dyn GatewaySession>,
    session: Arc<ScanSession>,
    retries: u32,
}

impl ShutdownController {
    pub fn new(gateway: Arc<dyn GatewaySession>, session: Arc<ScanSession>) -> Self {
        Self::with_retries(gateway, session, TEARDOWN_RETRIES)
    }

    pub fn with_retries(
        gateway: Arc<dyn GatewaySession>,
        session: Arc<ScanSession>,
        retries: u32,
    ) -> Self {
        Self {
            gateway,
            session,
            retries,
        }
    }

    /// Run the teardown sequence.
    ///
    /// The session flag is a one-way latch, so re-entrant triggers are no-ops
    /// beyond the first. Teardown errors are logged but never block progress
    /// toward termination. The sink, when present, is flushed and closed.
    pub async fn shutdown(&self, reason: &str, sink: Option<CsvSink>) {
        if !self.session.begin_shutdown() {
            return;
        }
        info!("{reason}");

        if self.gateway.is_open() {
            if self.gateway.is_live() {
                self.wind_down_gateway().await;
            }
            if let Err(error) = self.gateway.close().await {
                warn!(%error, "failed to close gateway session");
            }
        }

        if self.gateway.is_logged_in()
            && let Err(error) = self.gateway.logout().await
        {
            warn!(%error, "logout failed");
        }

        if let Some(mut sink) = sink
            && let Err(error) = sink.flush()
        {
            warn!(%error, "failed to flush output file");
        }

        info!("goodbye");
    }

    /// Stop scanning and disconnect devices, retrying with a short delay
    /// until the attempts are exhausted.
    async fn wind_down_gateway(&self) {
        let mode = self.session.config().mode;
        let mut attempts = self.retries;
        loop {
            match self.try_wind_down(mode).await {
                Ok(()) => return,
                Err(error) => {
                    warn!(%error, attempts, "teardown attempt failed");
                    if attempts == 0 {
                        return;
                    }
                    attempts -= 1;
                    sleep(TEARDOWN_RETRY_DELAY).await;
                }
            }
        }
    }

    async fn try_wind_down(&self, mode: ScanMode) -> Result<(), GatewayError> {
        // period 0 stops the scan
        self.gateway.issue_scan(mode.is_active(), 0).await?;
        let connected = self.gateway.connected_devices().await?;
        if !connected.is_empty() {
            self.gateway.disconnect_all().await?;
        }
        Ok(())
    }
}
