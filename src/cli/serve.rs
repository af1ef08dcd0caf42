//! Serve command implementation

use crate::api::{create_router, AppState};
use crate::cli::{load_config, ServeArgs};
use crate::config::SentinelConfig;
use crate::engine::{FailoverContext, FailoverEngine, FailoverSettings};
use crate::logging::init_tracing;
use crate::status::StatusReporter;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Load configuration with CLI overrides
pub fn load_config_with_overrides(
    args: &ServeArgs,
) -> Result<SentinelConfig, Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;

    // CLI overrides (highest priority)
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }
    if args.no_server {
        config.server.enabled = false;
    }

    Ok(config)
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
pub async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, shutting down...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        }
        _ = cancel_token.cancelled() => {}
    }

    cancel_token.cancel();
}

/// Main serve command handler
pub async fn run_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load and validate configuration
    let config = load_config_with_overrides(&args)?;
    config.validate()?;

    // 2. Initialize tracing
    init_tracing(&config.logging)?;

    tracing::info!(domain = %config.monitor.domain, "Starting failover sentinel");

    // 3. Wire collaborators and start the control loop
    let ctx = Arc::new(FailoverContext::from_config(&config)?);
    let engine = Arc::new(FailoverEngine::new(
        Arc::clone(&ctx),
        FailoverSettings::from_config(&config),
    ));

    let cancel_token = CancellationToken::new();
    let engine_handle = engine.start(cancel_token.clone());

    // 4. Serve the status API, or just wait for a signal
    if config.server.enabled {
        let metrics = match crate::metrics::setup_metrics() {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Metrics recorder unavailable");
                None
            }
        };
        let state = Arc::new(AppState::new(StatusReporter::new(ctx), metrics));
        let app = create_router(state, config.server.request_timeout());

        let addr = format!("{}:{}", config.server.host, config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(addr = %addr, "Status API listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(cancel_token.clone()))
            .await?;
    } else {
        tracing::info!("Status API disabled");
        shutdown_signal(cancel_token.clone()).await;
    }

    // 5. Cleanup; the in-flight tick finishes first
    cancel_token.cancel();
    tracing::info!("Waiting for the failover engine to stop");
    engine_handle.await?;

    tracing::info!("Failover sentinel stopped");
    Ok(())
}
