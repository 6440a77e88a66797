//! FSDB demo - creates a client, subscribes to state and stats, and reports status.

mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fsdb_bridge::{Bridge, Client, Error};

use crate::config::{Args, DemoConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fsdb_demo=info,fsdb_bridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Args::parse().into_config();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        client_id = %config.client.client_id,
        host = %config.client.host,
        subscribe_timeout_ms = config.client.subscribe_timeout.as_millis() as u64,
        "starting FSDB demo"
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "FSDB demo failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "native")]
async fn run(config: DemoConfig) -> Result<(), Error> {
    tracing::debug!(
        loopback_latency_ms = config.loopback_latency.as_millis() as u64,
        "loopback latency ignored with the native bridge"
    );
    run_with(fsdb_bridge::NativeBridge, config).await
}

#[cfg(not(feature = "native"))]
async fn run(config: DemoConfig) -> Result<(), Error> {
    let bridge = fsdb_bridge::LoopbackBridge::new().with_latency(config.loopback_latency);
    run_with(bridge, config).await
}

async fn run_with<B: Bridge>(bridge: B, config: DemoConfig) -> Result<(), Error> {
    let mut client = Client::create(bridge, config.client)?;
    tracing::info!(
        client_id = client.client_id(),
        bridge = client.bridge().name(),
        "client created"
    );

    client.subscribe_to_state().await?;
    client.subscribe_to_stats().await?;

    let status = client.status();
    tracing::info!(state = status.state, stats = status.stats, "subscription status");
    if config.json {
        let report = serde_json::json!({
            "client_id": client.client_id(),
            "status": status,
        });
        println!("{}", report);
    }

    if !config.once {
        // Listener loops for state and stats updates would be spawned here.
        tracing::info!("subscriptions established, press ctrl+c to exit");
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
        } else {
            tracing::info!("received shutdown signal");
        }
    }

    client.close();
    tracing::info!("client closed");
    Ok(())
}
