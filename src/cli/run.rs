//! Run command: a single monitoring cycle

use crate::cli::{load_config, RunArgs};
use crate::engine::{FailoverContext, FailoverEngine, FailoverSettings};
use crate::logging::init_tracing;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Handle `sentinel run`. SIGINT stops the cycle after the current tick.
pub async fn handle_run(args: &RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    config.validate()?;
    init_tracing(&config.logging)?;

    let ctx = Arc::new(FailoverContext::from_config(&config)?);
    let engine = FailoverEngine::new(ctx, FailoverSettings::from_config(&config));

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received SIGINT, finishing current tick");
            on_signal.cancel();
        }
    });

    let summary = engine.run_cycle(&cancel).await?;
    tracing::info!(
        ticks = summary.ticks,
        transitions = summary.transitions,
        cancelled = summary.cancelled,
        "Monitoring cycle complete"
    );

    Ok(())
}
