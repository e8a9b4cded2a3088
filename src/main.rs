use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linearb_mcp::config::Config;
use linearb_mcp::engine::LinearbEngine;
use linearb_mcp::mcp::McpServer;
use linearb_mcp::openapi;

#[derive(Parser, Debug)]
#[command(name = "linearb-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read-only MCP server for the LinearB API")]
struct Args {
    /// Path to the OpenAPI specification document (overrides
    /// LINEARB_OPENAPI_PATH)
    #[arg(long)]
    spec: Option<PathBuf>,

    /// Directory containing documentation files (overrides
    /// LINEARB_DOCS_DIR)
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Enable verbose logging (to stderr)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries JSON-RPC; all logging goes to stderr. The filter is
    // installed before Config::from_env so its startup warnings are seen.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if args.verbose {
            "debug".to_string()
        } else {
            std::env::var("LOG_LEVEL")
                .map(|v| v.to_lowercase())
                .unwrap_or_else(|_| "info".to_string())
        };
        EnvFilter::new(level)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env();

    if let Some(spec) = args.spec {
        config.spec_path = spec;
    }
    if let Some(docs) = args.docs {
        config.docs_dir = docs;
    }

    info!(base_url = %config.base_url, "starting LinearB MCP server");

    let model = openapi::load_model(&config.spec_path);
    if model.is_none() {
        info!("discovery degraded: serving static capability list");
    }

    let engine = Arc::new(LinearbEngine::new(&config, model)?);
    let server = McpServer::new(engine.clone());

    tokio::select! {
        result = server.run() => result?,
        _ = shutdown_signal() => {
            info!("termination signal received");
        }
    }

    // Release the connection pool on every exit path.
    engine.shutdown();
    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
