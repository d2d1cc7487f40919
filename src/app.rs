//! Core application runner (business logic) for `gateway-listener`.
//!
//! This module is intentionally decoupled from CLI parsing and process exit
//! codes so the whole pipeline can be tested deterministically with an
//! in-memory gateway session and injected output streams.

use crate::advertisement::extract;
use crate::filter::AdvFilter;
use crate::gateway::{ALL_DEVICES, GatewayError, GatewayEvent, GatewayReport, GatewaySession};
use crate::output::console;
use crate::output::csv::CsvSink;
use crate::prefs::Preferences;
use crate::prompt;
use crate::scan::{ScanOrchestrator, ScanSession};
use crate::shutdown::ShutdownController;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Time allowed for the gateway to answer the startup version query.
const VERSION_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised during interactive startup.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

/// Streams and sinks produced by a successful interactive startup.
struct Startup {
    events: mpsc::Receiver<GatewayEvent>,
    reports: mpsc::Receiver<GatewayReport>,
    sink: Option<CsvSink>,
}

/// Walk the user through login, gateway choice, scan parameters and the
/// output file, then open the session and subscribe to both streams.
///
/// Returns `Ok(None)` when the user picks the exit entry from the gateway
/// list.
async fn start(
    gateway: &dyn GatewaySession,
    session: &ScanSession,
) -> Result<Option<Startup>, RunError> {
    let mut prefs = Preferences::load();

    let credentials = prompt::credentials(&prefs)?;
    let gwids = gateway.login(&credentials.user, &credentials.pwd).await?;
    prefs.user = Some(credentials.user);

    let Some(gwid) = prompt::gateway(&gwids)? else {
        return Ok(None);
    };
    gateway.select_gateway(&gwid).await?;
    gateway.open().await?;

    let events = gateway.subscribe_events(ALL_DEVICES);
    let reports = gateway.subscribe_reports(ALL_DEVICES);

    let version = gateway.version(VERSION_TIMEOUT).await?;
    info!(%gwid, %version, "gateway connected");

    session.configure(prompt::scan_parameters()?);

    let sink = match prompt::output_file(&prefs)? {
        Some(name) => {
            let sink = CsvSink::append(Path::new(&name))?;
            prefs.data_file_name = Some(name);
            Some(sink)
        }
        None => None,
    };

    if let Err(error) = prefs.save() {
        warn!(%error, "failed to save preferences");
    }

    Ok(Some(Startup {
        events,
        reports,
        sink,
    }))
}

/// Handle one data report: normalize, filter and write advertisements,
/// log everything else.
pub fn handle_report(
    report: GatewayReport,
    filter: &dyn AdvFilter,
    sink: &mut Option<CsvSink>,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    match report {
        GatewayReport::Advertisements(batch) => {
            let records: Vec<_> = batch
                .iter()
                .map(extract)
                .filter(|record| filter.retain(record))
                .collect();
            console::write_records(out, &records)?;
            if let Some(sink) = sink {
                sink.write_records(&records)?;
            }
        }
        GatewayReport::Notification { payload } => {
            info!(%payload, "notification received");
        }
        GatewayReport::Other(code) => {
            info!(code, "unhandled gateway report");
        }
    }
    Ok(())
}

/// Consume both gateway streams until they run dry.
///
/// The first scan request is issued here; afterwards the orchestrator keeps
/// the scan cycle going from scan-complete events. Report handling errors
/// end the loop; stream order is preserved per stream.
pub async fn dispatch_loop(
    orchestrator: &ScanOrchestrator,
    filter: &dyn AdvFilter,
    mut events: mpsc::Receiver<GatewayEvent>,
    mut reports: mpsc::Receiver<GatewayReport>,
    sink: &mut Option<CsvSink>,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    orchestrator.start().await;

    let mut events_open = true;
    let mut reports_open = true;
    while events_open || reports_open {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => orchestrator.handle_event(event).await,
                None => events_open = false,
            },
            report = reports.recv(), if reports_open => match report {
                Some(report) => handle_report(report, filter, sink, out)?,
                None => reports_open = false,
            },
        }
    }
    Ok(())
}

/// Run the whole client against the given gateway session.
///
/// Every outcome, including startup errors and user interrupts, funnels into
/// the same shutdown sequence, so the caller always gets `Ok`.
pub async fn run(gateway: Arc<dyn GatewaySession>, filter: &dyn AdvFilter) -> Result<(), RunError> {
    let session = Arc::new(ScanSession::default());
    let controller = ShutdownController::new(Arc::clone(&gateway), Arc::clone(&session));

    match start(gateway.as_ref(), &session).await {
        Ok(Some(startup)) => {
            let Startup {
                events,
                reports,
                mut sink,
            } = startup;
            let orchestrator = ScanOrchestrator::new(Arc::clone(&gateway), Arc::clone(&session));
            let mut out = io::stdout();
            let reason = tokio::select! {
                result = dispatch_loop(&orchestrator, filter, events, reports, &mut sink, &mut out) => {
                    match result {
                        Ok(()) => "gateway streams closed, shutting down".to_string(),
                        Err(error) => format!("error, exiting: {error}"),
                    }
                }
                _ = tokio::signal::ctrl_c() => "interrupted, shutting down".to_string(),
            };
            controller.shutdown(&reason, sink.take()).await;
        }
        Ok(None) => {
            controller.shutdown("shutting down", None).await;
        }
        Err(error) => {
            controller
                .shutdown(&format!("error, exiting: {error}"), None)
                .await;
        }
    }
    Ok(())
}
