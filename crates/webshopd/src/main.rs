//! webshopd — the webshop daemon.
//!
//! Assembles the order API in one process:
//! - Config (webshop.toml + flags + sidecar environment)
//! - State store client (one instance, shared by all handlers)
//! - REST API
//!
//! # Usage
//!
//! ```text
//! DAPR_HTTP_PORT=3500 webshopd serve --port 5000 --config webshop.toml
//! ```

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use webshop_api::SidecarPorts;
use webshop_state::StateStoreClient;

use crate::config::WebshopConfig;

const HTTP_PORT_ENV: &str = "DAPR_HTTP_PORT";
const GRPC_PORT_ENV: &str = "DAPR_GRPC_PORT";

/// Used when `RUST_LOG` is unset. Targets are crate names with underscores.
const DEFAULT_LOG_FILTER: &str = "info,webshopd=debug,webshop_state=debug,webshop_api=debug";

#[derive(Parser)]
#[command(name = "webshopd", about = "Webshop daemon")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the order API.
    Serve {
        /// Config file; missing file means defaults.
        #[arg(long, default_value = "webshop.toml")]
        config: PathBuf,

        /// Port to listen on (overrides the config file).
        #[arg(long)]
        port: Option<u16>,

        /// Sidecar host (overrides the config file).
        #[arg(long)]
        sidecar_host: Option<String>,

        /// State store name (overrides the config file).
        #[arg(long)]
        store_name: Option<String>,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match cli.command {
        Command::Serve {
            config,
            port,
            sidecar_host,
            store_name,
        } => {
            let mut settings = WebshopConfig::from_file(&config)?;
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(host) = sidecar_host {
                settings.state.host = host;
            }
            if let Some(name) = store_name {
                settings.state.store_name = name;
            }
            run_serve(settings).await
        }
    }
}

async fn run_serve(mut settings: WebshopConfig) -> anyhow::Result<()> {
    info!("webshop daemon starting");

    // ── Sidecar discovery ──────────────────────────────────────

    let ports = SidecarPorts {
        http_port: std::env::var(HTTP_PORT_ENV).ok(),
        grpc_port: std::env::var(GRPC_PORT_ENV).ok(),
    };
    info!(
        http_port = ports.http_port.as_deref().unwrap_or("<unset>"),
        grpc_port = ports.grpc_port.as_deref().unwrap_or("<unset>"),
        "sidecar environment"
    );
    settings.apply_sidecar_port(ports.http_port.as_deref());

    // ── State client ───────────────────────────────────────────

    let client = StateStoreClient::new(&settings.state).context("building state client")?;
    info!(store_url = client.store_url(), "state client initialized");

    // ── Start API server ───────────────────────────────────────

    let router = webshop_api::build_router(client, ports);
    let ip = settings
        .server
        .host
        .parse()
        .with_context(|| format!("invalid listen host {:?}", settings.server.host))?;
    let addr = SocketAddr::new(ip, settings.server.port);

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("webshop daemon stopped");
    Ok(())
}
