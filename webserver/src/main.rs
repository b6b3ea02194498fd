//! WebServer entry point
//!
//! Mounts one queue widget and serves it to browsers until Ctrl+C

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use queue::QueueWidget;
use shared::{logging, process_info, ConfigOverrides, ProcessId, QueueConfig};
use webserver::{RealStaticFileServer, RealWebSocketManager, WebServer, WebServerError, WebServerResult};

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "Serve the microwave queue to browsers")]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for HTTP server (browser connections)
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Tracing endpoint URL (if set, traces will be sent here)
    #[arg(long)]
    trace_ep: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Static files directory
    #[arg(long, default_value = "./static")]
    static_dir: PathBuf,

    /// Comma separated participant names (overrides QUEUE_ROSTER)
    #[arg(long)]
    roster: Option<String>,

    /// JSON file containing an array of participant names
    #[arg(long)]
    roster_file: Option<PathBuf>,

    /// Pause before a new order is revealed, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Seed for reproducible orders
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    ProcessId::init_webserver();

    let trace_endpoint = args
        .trace_ep
        .as_ref()
        .map(|url| logging::TracingEndpoint::new(url.clone()));
    logging::init_tracing_with_endpoint_and_level(trace_endpoint, Some(&args.log_level));

    let http_addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| WebServerError::config(format!("Invalid bind address: {}", e)))?;

    let config = QueueConfig::from_env()?.apply(ConfigOverrides {
        roster: args.roster,
        roster_file: args.roster_file,
        delay_ms: args.delay_ms,
        seed: args.seed,
    })?;

    process_info!(
        ProcessId::current(),
        "🍿 Roster of {} participants, reveal delay {}ms",
        config.roster.len(),
        config.delay_ms
    );

    let widget = QueueWidget::from_config(&config)?;
    let webserver = WebServer::new(
        http_addr,
        widget,
        RealWebSocketManager::new(),
        RealStaticFileServer::new(&args.static_dir),
    );

    logging::log_startup(ProcessId::current(), &format!("HTTP on {}", http_addr));
    webserver.run().await?;

    logging::log_success(ProcessId::current(), "WebServer stopped gracefully");
    Ok(())
}
