#[cfg(feature = "accelerate")]
extern crate accelerate_src;

#[cfg(feature = "mkl")]
extern crate intel_mkl_src;

mod cli;
mod responses;
mod routes;
mod workers;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::routes::router;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let app = router(&args).inspect_err(|e| {
        tracing::error!("Failed to load the sentiment handler: {:#}", e);
    })?;

    let listener = tokio::net::TcpListener::bind(args.host()).await?;
    tracing::info!("Listening on {}", args.host());
    axum::serve(listener, app).await?;

    Ok(())
}
