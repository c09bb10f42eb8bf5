//! ToyStand Gateway - Main Entry Point
//!
//! Starts the serving runtime, deploys the configured deployments and
//! serves them over HTTP. Any failure during startup is fatal.

use anyhow::Context;
use std::sync::Arc;
use toystand_common::ToyStandConfig;
use toystand_deployments::build_deployment;
use toystand_gateway::{build_router, serve, ServeRuntime};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ToyStandConfig::load();

    // Initialize logging
    let level = config
        .as_ref()
        .map(|c| c.observability.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "toystand_gateway={level},toystand_deployments={level},tower_http={level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ToyStand Gateway");

    let result = match config.context("Failed to load configuration") {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        error!("Failed to start deployment: {:#}", e);
    }
    result
}

async fn run(config: ToyStandConfig) -> anyhow::Result<()> {
    info!(
        "Configuration loaded: bind={}:{}, prefix={}, deployments={:?}",
        config.bind_address, config.port, config.route_prefix, config.deployments
    );

    let runtime = Arc::new(ServeRuntime::new(config.route_prefix.clone()));
    runtime.ensure_started();

    for route in &config.deployments {
        let handle = build_deployment(route, &config.model)?;
        runtime
            .deploy(handle)
            .await
            .with_context(|| format!("Failed to deploy {}", route))?;
    }

    let addr = config.socket_addr()?;
    let router = build_router(runtime.clone(), config.observability.enable_metrics);

    info!(
        "API deployed successfully: {} deployment(s) under {}",
        runtime.deployment_count().await,
        runtime.route_prefix()
    );

    serve(addr, router).await?;

    info!("ToyStand Gateway shutdown complete");
    Ok(())
}
