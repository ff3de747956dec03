//! SepsisCare API Gateway
//!
//! A single-binary gateway in front of the platform's microservices.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 API GATEWAY                   │
//!                     │                                               │
//!   Client Request    │  ┌────────┐   ┌─────────┐   ┌────────────┐   │
//!   ──────────────────┼─▶│  http  │──▶│ routing │──▶│  forwarder │───┼──▶ Backend
//!                     │  │ server │   │  table  │   │ (rewrite + │   │    Service
//!                     │  └────────┘   └─────────┘   │  relay)    │   │
//!                     │                             └────────────┘   │
//!                     │                                               │
//!   GET /api/         │  ┌────────────────────────────────────────┐  │
//!   checkStatus       │  │ health aggregator: fan-out probes over │  │
//!   ──────────────────┼─▶│ ML model / alert system / database,    │──┼──▶ Dependencies
//!                     │  │ join-all, flat status body             │  │
//!                     │  └────────────────────────────────────────┘  │
//!                     │                                               │
//!                     │  config (TOML) · tracing · metrics · shutdown │
//!                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sepsiscare_gateway::config::{load_config, GatewayConfig};
use sepsiscare_gateway::http::HttpServer;
use sepsiscare_gateway::lifecycle::Shutdown;
use sepsiscare_gateway::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "sepsiscare-gateway", version, about = "SepsisCare API gateway")]
struct Cli {
    /// Path to the TOML configuration file. Built-in defaults are used
    /// when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A broken route table must never serve traffic.
    let config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => GatewayConfig::default(),
    };

    logging::init_tracing(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        probes = config.health.probes.len(),
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
