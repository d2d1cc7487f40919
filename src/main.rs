use clap::Parser;
use gateway_listener::app;
use gateway_listener::filter::MatchAll;
use gateway_listener::gateway::fake::FakeGateway;
use std::panic::{self, PanicHookInfo};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Exit codes for the application
const EXIT_SUCCESS: i32 = 0;
const EXIT_PANIC: i32 = 2;

/// Interactive BLE advertisement logger for cloud-managed gateways.
///
/// All runtime choices are made through prompts after startup; the command
/// line only carries `--help` and `--version`.
#[derive(Parser, Debug)]
#[command(author, about, version)]
struct Options {}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set up panic hook to ensure clean exit codes for process managers
    // that monitor exit status
    panic::set_hook(Box::new(move |info: &PanicHookInfo| {
        eprintln!("Panic! {}", info);
        std::process::exit(EXIT_PANIC);
    }));

    let _options = Options::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("Advertisement scanner with file save");
    println!("Press Ctrl-C to exit");

    let gateway = Arc::new(FakeGateway::simulated());
    if let Err(error) = app::run(gateway, &MatchAll).await {
        eprintln!("error: {}", error);
    }

    // teardown already ran and logged any faults
    std::process::exit(EXIT_SUCCESS);
}
