// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tassed: task-as-a-service daemon.
//!
//! Long-running process that scans a task directory tree, keeps the
//! scheduled-job set in sync with it, fires due jobs through a bounded
//! worker pool, and exposes the rescan/trigger control endpoints.

use std::sync::Arc;

use tasse_server::{api, AppState, Config};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("tassed {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("tassed {}", env!("CARGO_PKG_VERSION"));
                println!("tasse - task as a service with a scheduler");
                println!();
                println!("USAGE:");
                println!("    tassed");
                println!();
                println!("Tasks are defined as directories under <data>/tasks, each with");
                println!("a task.yaml manifest. The data directory is taken from");
                println!("TASSE_DATA_DIR (default: ~/.local/state/tasse).");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: tassed [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;
    std::fs::create_dir_all(&config.data_dir)?;
    // Relative paths in task scripts resolve against the data root.
    std::env::set_current_dir(&config.data_dir)?;
    let _log_guard = setup_logging(&config)?;

    info!("tasse - task as a service with a scheduler");

    let service = match tasse_server::startup(&config).await {
        Ok(service) => service,
        Err(tasse_server::LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("tassed is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            error!("failed to start service: {}", e);
            return Err(e.into());
        }
    };

    service.spawn_dispatch_loop();

    let state = AppState {
        scheduler: Arc::clone(&service.scheduler),
        registry: Arc::clone(&service.registry),
    };
    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", config.bind_addr);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("http server error: {}", e);
            }
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down...");
        }
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down...");
        }
    }

    service.shutdown();
    info!("service stopped");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().unwrap_or(&config.data_dir),
        config
            .log_path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("tassed.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}
