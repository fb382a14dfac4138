//! Compute Service
//!
//! HTTP server exposing matrix algebra, descriptive statistics, vector
//! geometry and Monte Carlo simulation.

use clap::Parser;
use compute_server::config::{LogLevel, ServerConfig};
use compute_server::server::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Compute Service - numerical compute over HTTP
#[derive(Parser, Debug)]
#[command(name = "compute_server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Host address to bind to
    #[arg(long, env = "COMPUTE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "COMPUTE_PORT")]
    port: Option<u16>,

    /// Worker pool size for the compute engine
    #[arg(long, env = "COMPUTE_POOL_SIZE")]
    pool_size: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "COMPUTE_LOG_LEVEL")]
    log_level: Option<LogLevel>,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let mut config = ServerConfig::default();
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(pool_size) = self.pool_size {
            config.pool_size = pool_size;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        config
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().into_config();
    config.validate()?;

    init_tracing(config.log_level.as_filter_str());

    tracing::info!("Compute Service v{}", compute_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        pool_size = %config.pool_size,
        log_level = %config.log_level,
        "Server configuration loaded"
    );

    let server = Server::new(config);
    tracing::info!(address = %server.socket_addr(), "Starting server");

    server.run().await?;

    Ok(())
}
