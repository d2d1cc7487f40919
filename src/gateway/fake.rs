//! In-memory gateway session.
//!
//! Serves two purposes: a scripted stand-in for unit tests and benches, and
//! the built-in simulation backend the binary runs against when no vendor
//! gateway-access library is compiled in. Calls are recorded so tests can
//! assert on the exact request sequence.

use super::{GatewayError, GatewayEvent, GatewayReport, GatewaySession};
use crate::advertisement::{AdField, RawAdvertisement};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Buffer size for the event and report channels.
const CHANNEL_BUFFER_SIZE: usize = 100;

/// A scripted in-memory gateway session.
///
/// In simulation mode each accepted timed scan request produces one
/// synthetic advertisement batch followed by a scan-complete event after the
/// scan period elapses, which is enough to drive the continuous-scan loop
/// end to end.
pub struct FakeGateway {
    gwids: Vec<String>,
    simulate: bool,
    login_failure: Mutex<Option<GatewayError>>,
    /// Failures handed out to successive `issue_scan` calls; empty = accept.
    scan_failures: Mutex<VecDeque<GatewayError>>,
    scan_requests: Mutex<Vec<(bool, u32)>>,
    connected: Mutex<Vec<String>>,
    disconnect_calls: AtomicUsize,
    close_calls: AtomicUsize,
    logout_calls: AtomicUsize,
    open: AtomicBool,
    live: AtomicBool,
    logged_in: AtomicBool,
    event_tx: Mutex<Option<mpsc::Sender<GatewayEvent>>>,
    report_tx: Mutex<Option<mpsc::Sender<GatewayReport>>>,
}

impl FakeGateway {
    /// A quiet fake with a single gateway; tests drive it explicitly.
    pub fn new() -> Self {
        Self::with_gateways(vec!["gw-0001".to_string()])
    }

    /// A quiet fake exposing the given gateway ids.
    pub fn with_gateways(gwids: Vec<String>) -> Self {
        Self {
            gwids,
            simulate: false,
            login_failure: Mutex::new(None),
            scan_failures: Mutex::new(VecDeque::new()),
            scan_requests: Mutex::new(Vec::new()),
            connected: Mutex::new(Vec::new()),
            disconnect_calls: AtomicUsize::new(0),
            close_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            open: AtomicBool::new(false),
            live: AtomicBool::new(true),
            logged_in: AtomicBool::new(false),
            event_tx: Mutex::new(None),
            report_tx: Mutex::new(None),
        }
    }

    /// The simulation backend used by the binary.
    pub fn simulated() -> Self {
        let mut fake = Self::with_gateways(vec!["gw-sim-0001".to_string()]);
        fake.simulate = true;
        fake
    }

    /// Queue a failure for the next `issue_scan` call.
    pub fn fail_next_scan(&self, error: GatewayError) {
        self.scan_failures
            .lock()
            .expect("lock poisoned")
            .push_back(error);
    }

    /// Make `login` fail with the given error.
    pub fn fail_login(&self, error: GatewayError) {
        *self.login_failure.lock().expect("lock poisoned") = Some(error);
    }

    /// Pretend the given devices are connected.
    pub fn set_connected(&self, dids: Vec<String>) {
        *self.connected.lock().expect("lock poisoned") = dids;
    }

    /// Mark the gateway unreachable while the session stays open.
    pub fn set_live(&self, live: bool) {
        self.live.store(live, Ordering::SeqCst);
    }

    /// Deliver one event to the subscribed event stream.
    pub fn push_event(&self, event: GatewayEvent) {
        if let Some(tx) = self.event_tx.lock().expect("lock poisoned").as_ref() {
            let _ = tx.try_send(event);
        }
    }

    /// Deliver one report to the subscribed report stream.
    pub fn push_report(&self, report: GatewayReport) {
        if let Some(tx) = self.report_tx.lock().expect("lock poisoned").as_ref() {
            let _ = tx.try_send(report);
        }
    }

    /// Drop both stream senders so subscribed receivers run dry.
    pub fn close_streams(&self) {
        self.event_tx.lock().expect("lock poisoned").take();
        self.report_tx.lock().expect("lock poisoned").take();
    }

    /// Every `(active, period_secs)` scan request seen so far.
    pub fn scan_requests(&self) -> Vec<(bool, u32)> {
        self.scan_requests.lock().expect("lock poisoned").clone()
    }

    /// Number of timed (period > 0) scan requests accepted or rejected.
    pub fn timed_scan_requests(&self) -> usize {
        self.scan_requests().iter().filter(|(_, p)| *p > 0).count()
    }

    /// Number of stop-scan (period 0) requests.
    pub fn stop_scan_requests(&self) -> usize {
        self.scan_requests().iter().filter(|(_, p)| *p == 0).count()
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }

    fn spawn_scan_cycle(&self, period_secs: u32) {
        let event_tx = self.event_tx.lock().expect("lock poisoned").clone();
        let report_tx = self.report_tx.lock().expect("lock poisoned").clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(u64::from(period_secs))).await;
            if let Some(tx) = report_tx {
                let _ = tx
                    .send(GatewayReport::Advertisements(synthetic_batch()))
                    .await;
            }
            if let Some(tx) = event_tx {
                let _ = tx.send(GatewayEvent::ScanComplete).await;
            }
        });
    }
}

impl Default for FakeGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GatewaySession for FakeGateway {
    async fn login(&self, _user: &str, _pwd: &str) -> Result<Vec<String>, GatewayError> {
        if let Some(error) = self.login_failure.lock().expect("lock poisoned").take() {
            return Err(error);
        }
        self.logged_in.store(true, Ordering::SeqCst);
        Ok(self.gwids.clone())
    }

    async fn select_gateway(&self, gwid: &str) -> Result<(), GatewayError> {
        if self.gwids.iter().any(|id| id == gwid) {
            Ok(())
        } else {
            Err(GatewayError::Session(format!("unknown gateway: {gwid}")))
        }
    }

    async fn open(&self) -> Result<(), GatewayError> {
        self.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn version(&self, _timeout: Duration) -> Result<String, GatewayError> {
        Ok("sim-1.0.0".to_string())
    }

    fn subscribe_events(&self, _filter: &str) -> mpsc::Receiver<GatewayEvent> {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        *self.event_tx.lock().expect("lock poisoned") = Some(tx);
        rx
    }

    fn subscribe_reports(&self, _filter: &str) -> mpsc::Receiver<GatewayReport> {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        *self.report_tx.lock().expect("lock poisoned") = Some(tx);
        rx
    }

    async fn issue_scan(&self, active: bool, period_secs: u32) -> Result<(), GatewayError> {
        self.scan_requests
            .lock()
            .expect("lock poisoned")
            .push((active, period_secs));
        if let Some(error) = self
            .scan_failures
            .lock()
            .expect("lock poisoned")
            .pop_front()
        {
            return Err(error);
        }
        if self.simulate && period_secs > 0 {
            self.spawn_scan_cycle(period_secs);
        }
        Ok(())
    }

    async fn connected_devices(&self) -> Result<Vec<String>, GatewayError> {
        Ok(self.connected.lock().expect("lock poisoned").clone())
    }

    async fn disconnect_all(&self) -> Result<(), GatewayError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.connected.lock().expect("lock poisoned").clear();
        Ok(())
    }

    async fn close(&self) -> Result<(), GatewayError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logged_in.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }
}

/// One synthetic advertisement batch for the simulation backend.
fn synthetic_batch() -> Vec<RawAdvertisement> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64();
    vec![
        RawAdvertisement {
            timestamp_secs: now,
            address_hex: "a6b5c4d3e2f1".to_string(),
            address_type: 0,
            event_type: 0,
            rssi: -58,
            adv: vec![AdField::new(9, "SimTag")],
            rsp: vec![],
        },
        RawAdvertisement {
            timestamp_secs: now,
            address_hex: "060504030201".to_string(),
            address_type: 1,
            event_type: 3,
            rssi: -81,
            adv: vec![AdField::new(0xFF, "9904")],
            rsp: vec![AdField::new(8, "SimBeacon")],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_exposes_gateways() {
        let fake = FakeGateway::with_gateways(vec!["gw-a".into(), "gw-b".into()]);
        let gwids = fake.login("user@example.com", "secret").await.unwrap();
        assert_eq!(gwids, vec!["gw-a".to_string(), "gw-b".to_string()]);
        assert!(fake.is_logged_in());
    }

    #[tokio::test]
    async fn test_select_unknown_gateway_fails() {
        let fake = FakeGateway::new();
        assert!(fake.select_gateway("gw-0001").await.is_ok());
        assert!(fake.select_gateway("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_scan_failure_queue() {
        let fake = FakeGateway::new();
        fake.fail_next_scan(GatewayError::Transport("queue full".into()));
        assert!(fake.issue_scan(true, 1).await.is_err());
        assert!(fake.issue_scan(true, 1).await.is_ok());
        assert_eq!(fake.timed_scan_requests(), 2);
    }

    #[tokio::test]
    async fn test_pushed_events_arrive_in_order() {
        let fake = FakeGateway::new();
        let mut events = fake.subscribe_events(super::super::ALL_DEVICES);
        fake.push_event(GatewayEvent::ScanComplete);
        fake.push_event(GatewayEvent::Other(7));
        fake.close_streams();

        assert_eq!(events.recv().await, Some(GatewayEvent::ScanComplete));
        assert_eq!(events.recv().await, Some(GatewayEvent::Other(7)));
        assert_eq!(events.recv().await, None);
    }
}
