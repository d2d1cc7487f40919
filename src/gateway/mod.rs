//! Gateway session abstraction.
//!
//! The cloud gateway protocol lives in an external access library; this
//! module defines the seam the rest of the program talks through, so the
//! whole pipeline can be driven by an in-memory session in tests and in the
//! built-in simulation backend.

pub mod fake;

use crate::advertisement::RawAdvertisement;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Wildcard device filter accepted by the subscription calls.
pub const ALL_DEVICES: &str = "*";

/// Structured error payload carried by rejected gateway operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Login or gateway-selection failure.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The session is missing, closed, or in the wrong state for the call.
    #[error("session error: {0}")]
    Session(String),
    /// The transport rejected or dropped the request.
    #[error("transport error: {0}")]
    Transport(String),
    /// The gateway did not answer within the allotted time.
    #[error("gateway did not respond within {0:?}")]
    Timeout(Duration),
}

/// Lifecycle events delivered out of band by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayEvent {
    /// A connected device dropped its connection.
    Disconnect { did: String },
    /// One timed scan cycle finished.
    ScanComplete,
    /// Any other event, identified by its wire code.
    Other(u16),
}

/// Data reports delivered out of band by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayReport {
    /// One batch of advertisement records, in delivery order.
    Advertisements(Vec<RawAdvertisement>),
    /// A notification payload from a connected device.
    Notification { payload: String },
    /// Any other report, identified by its wire code.
    Other(u16),
}

/// Async operations consumed from the external gateway-access library.
///
/// Calls resolve once the gateway acknowledges the request. Completion of a
/// timed scan is signalled later by [`GatewayEvent::ScanComplete`] on the
/// event stream, not by `issue_scan` returning.
#[async_trait]
pub trait GatewaySession: Send + Sync {
    /// Authenticate and return the gateway ids available to this account.
    async fn login(&self, user: &str, pwd: &str) -> Result<Vec<String>, GatewayError>;

    /// Bind the session to one gateway.
    async fn select_gateway(&self, gwid: &str) -> Result<(), GatewayError>;

    /// Open the connection to the selected gateway.
    async fn open(&self) -> Result<(), GatewayError>;

    /// Query the gateway firmware version; fails when the gateway is offline.
    async fn version(&self, timeout: Duration) -> Result<String, GatewayError>;

    /// Subscribe to lifecycle events for devices matching `filter`.
    fn subscribe_events(&self, filter: &str) -> mpsc::Receiver<GatewayEvent>;

    /// Subscribe to data reports for devices matching `filter`.
    fn subscribe_reports(&self, filter: &str) -> mpsc::Receiver<GatewayReport>;

    /// Request one timed scan. A period of zero stops scanning.
    async fn issue_scan(&self, active: bool, period_secs: u32) -> Result<(), GatewayError>;

    /// List the addresses of currently connected devices.
    async fn connected_devices(&self) -> Result<Vec<String>, GatewayError>;

    /// Disconnect every connected device.
    async fn disconnect_all(&self) -> Result<(), GatewayError>;

    /// Close the gateway connection.
    async fn close(&self) -> Result<(), GatewayError>;

    /// End the login session.
    async fn logout(&self) -> Result<(), GatewayError>;

    /// Whether a gateway connection is open.
    fn is_open(&self) -> bool;

    /// Whether the gateway is currently reachable.
    fn is_live(&self) -> bool;

    /// Whether a login session is active.
    fn is_logged_in(&self) -> bool;
}
