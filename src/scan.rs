//! Continuous-scan orchestration.
//!
//! The gateway runs one timed scan at a time and announces its end with a
//! scan-complete event. The orchestrator re-issues the next scan request on
//! each such event until shutdown begins, so exactly one request is ever
//! outstanding.

use crate::gateway::{GatewayEvent, GatewaySession};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{info, warn};

/// Scan mode requested from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Active,
    Passive,
}

impl ScanMode {
    /// Wire encoding used by the gateway: active scans are `true`.
    pub fn is_active(self) -> bool {
        matches!(self, ScanMode::Active)
    }
}

/// Scan configuration fixed during interactive startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    pub mode: ScanMode,
    pub period_secs: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Active,
            period_secs: 1,
        }
    }
}

/// Process-wide scan session state.
///
/// One instance is shared by the orchestrator, the shutdown controller and
/// the dispatch loop. The configuration is written once during startup; the
/// shutdown flag makes a single false→true transition and is never reset.
#[derive(Debug)]
pub struct ScanSession {
    config: Mutex<ScanConfig>,
    shutting_down: AtomicBool,
}

impl ScanSession {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config: Mutex::new(config),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Store the prompted scan parameters. Called once during startup.
    pub fn configure(&self, config: ScanConfig) {
        *self
            .config
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn config(&self) -> ScanConfig {
        *self
            .config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Latch the shutdown flag. Returns `true` only for the call that made
    /// the false→true transition, so re-entrant triggers become no-ops.
    pub fn begin_shutdown(&self) -> bool {
        !self.shutting_down.swap(true, Ordering::SeqCst)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Drives the scan-restart protocol against the gateway session.
pub struct ScanOrchestrator {
    gateway: Arc<dyn GatewaySession>,
    session: Arc<ScanSession>,
}

impl ScanOrchestrator {
    pub fn new(gateway: Arc<dyn GatewaySession>, session: Arc<ScanSession>) -> Self {
        Self { gateway, session }
    }

    /// Issue the first scan request.
    pub async fn start(&self) {
        self.request_scan().await;
    }

    /// React to one lifecycle event from the gateway.
    ///
    /// Scan-complete events restart scanning; device-lifecycle events are
    /// observed and logged without a state change.
    pub async fn handle_event(&self, event: GatewayEvent) {
        match event {
            GatewayEvent::ScanComplete => self.request_scan().await,
            GatewayEvent::Disconnect { did } => {
                info!(%did, "device disconnect event");
            }
            GatewayEvent::Other(code) => {
                info!(code, "unhandled gateway event");
            }
        }
    }

    /// Request one timed scan with the stored mode and period, unless the
    /// session is shutting down.
    ///
    /// A rejected request is logged and swallowed with no retry; scanning
    /// then stalls until the next scan-complete event or a fresh `start`.
    async fn request_scan(&self) {
        if self.session.is_shutting_down() {
            return;
        }
        let config = self.session.config();
        if let Err(error) = self
            .gateway
            .issue_scan(config.mode.is_active(), config.period_secs)
            .await
        {
            warn!(%error, "scan request failed");
        }
    }
}
