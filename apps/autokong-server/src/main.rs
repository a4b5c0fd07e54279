//! autokong registration relay.
//!
//! Reads the Kong admin base URL from `KONG_URL` and serves `/add` and
//! `/remove` until interrupted.
//!
//! ```bash
//! KONG_URL=http://kong:8001 autokong-server --listen 0.0.0.0:8080
//! ```

use std::net::SocketAddr;
use std::process::ExitCode;

use anyhow::Context;
use autokong::{RegistrationRelay, RelayConfig};
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "autokong-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address the relay listens on
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format_args!("{err:#}"), "autokong-server failed");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` overrides the default `info` level.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    // Configuration errors abort before anything is bound.
    let config = RelayConfig::from_env().context("invalid relay configuration")?;
    let relay = RegistrationRelay::new(&config).context("failed to build registration relay")?;

    let listener = tokio::net::TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind {}", cli.listen))?;
    info!(addr = %cli.listen, "Relay listening");

    axum::serve(listener, relay.router())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Relay stopped");
    Ok(())
}

/// Resolves on SIGINT (ctrl-c) or, on unix, SIGTERM.
async fn shutdown_signal() {
    tokio::select! {
        () = wait_ctrl_c() => info!("Received SIGINT signal"),
        () = wait_sigterm() => info!("Received SIGTERM signal"),
    }
}

async fn wait_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn wait_sigterm() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(err) => {
            error!(error = %err, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_sigterm() {
    std::future::pending::<()>().await;
}
