//! # Rolodex Server
//!
//! Main entry point: loads configuration, wires the application and
//! serves the REST API until Ctrl+C or SIGTERM.

use rolodex_config::ConfigLoader;
use rolodex_core::{RolodexError, RolodexResult};
use rolodex_server::{
    app::AppBuilder,
    logging::init_logging,
    startup::{print_banner, print_startup_info},
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

const MAIL_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location().load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();

    info!("Starting Rolodex Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: rolodex_config::AppConfig) -> RolodexResult<()> {
    let addr = config.server.addr();
    let public_url = config.server.public_url.clone();

    let app = AppBuilder::new(config).build().await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RolodexError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    print_startup_info(&addr, &public_url);

    let service = app
        .router
        .into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| RolodexError::Internal(format!("Server error: {}", e)))?;

    // The router held the last outbox sender, so the worker drains and exits.
    match tokio::time::timeout(MAIL_DRAIN_TIMEOUT, app.mail_worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Mail worker ended abnormally: {}", e),
        Err(_) => warn!("Mail queue not drained within {:?}", MAIL_DRAIN_TIMEOUT),
    }
    app.db_pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
