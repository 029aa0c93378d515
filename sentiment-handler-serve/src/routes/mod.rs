pub(crate) mod invocations;
pub(crate) mod ping;

use anyhow::Result;
use axum::{routing::get, Router};
use sentiment_handler_pipelines::{InputData, SentimentHandler};
use serde_json::json;
use std::sync::Arc;

use crate::cli::Cli;

/// Loads the handler and builds the router with all the routes of the hosting contract.
pub(crate) fn router(args: &Cli) -> Result<Router> {
    let device = args.device()?;

    tracing::info!(
        "Loading sentiment handler from '{}' on device {:?}",
        args.model_dir().display(),
        device
    );

    let handler = Arc::new(SentimentHandler::load(
        args.model_dir(),
        &device,
        args.handler_config(),
    )?);

    tracing::info!("Warming up the model...");
    warm_up(&handler).unwrap_or_else(|e| {
        tracing::error!("Failed to warm up the model: {}", e);
    });

    Ok(Router::new()
        .route("/ping", get(ping::ping))
        .merge(invocations::router(handler, args.num_workers())))
}

fn warm_up(handler: &SentimentHandler) -> sentiment_handler::Result<()> {
    let prediction = handler.predict(&InputData::new(json!({"text": "Warming up"})))?;
    tracing::debug!("Warm up prediction: {}", prediction.index());
    Ok(())
}
