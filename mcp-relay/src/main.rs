//! mcp-relay: expose a remote Streamable HTTP MCP server over stdio.

use clap::Parser;
use std::path::PathBuf;
use tokio::io::{stdin, stdout, BufReader};
use tracing::{error, info, warn};

use mcp_relay::{config::ConfigOverrides, logging, Config, Relay};

/// Relay MCP JSON-RPC messages between stdin/stdout and a remote HTTP endpoint
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the remote MCP server (requests go to <URL>/mcp/)
    #[arg(long, env = "MCP_RELAY_URL")]
    url: Option<String>,

    /// Timeout for one HTTP exchange, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Value sent in the MCP-Protocol-Version header
    #[arg(long)]
    protocol_version: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            url: args.url,
            timeout_secs: args.timeout_secs,
            protocol_version: args.protocol_version,
            log_level: args.log_level,
            log_file: args.log_file,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_figment(args.into())?;

    // Held until exit so buffered file logs are flushed
    let log_guard = logging::init(&config)?;

    info!("Starting MCP relay v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Remote: {} (timeout {}s, protocol {})",
        config.url,
        config.timeout.as_secs(),
        config.protocol_version
    );

    let mut relay = Relay::new(&config)?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let result = relay
        .run(BufReader::new(stdin()), stdout(), shutdown_signal)
        .await;
    drop(relay);

    let code = match result {
        Ok(()) => 0,
        Err(e) => {
            error!("Relay failed: {:#}", e);
            1
        }
    };
    drop(log_guard);

    // Stdin is read on a blocking thread that would keep the runtime from
    // shutting down after an interrupt.
    std::process::exit(code)
}
