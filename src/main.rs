use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tandoor_mcp::config::{self, ConfigOverrides, TransportMode};
use tandoor_mcp::tandoor::TandoorClient;
use tandoor_mcp::{api, mcp};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "tandoor-mcp")]
#[command(about = "MCP server for the Tandoor recipe manager", long_about = None)]
#[command(version)]
struct Cli {
    /// Serve only over stdin/stdout
    #[arg(long)]
    stdio: bool,

    /// Transport selection (stdio, http, all)
    #[arg(long, env = "MCP_TRANSPORT")]
    transport: Option<String>,

    /// Base URL of the Tandoor API, e.g. https://recipes.example.com/api
    #[arg(long, env = "TANDOOR_API_URL")]
    api_url: Option<String>,

    /// Tandoor API bearer token
    #[arg(long, env = "TANDOOR_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Override log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mode = TransportMode::resolve(cli.stdio, cli.transport.as_deref());

    let overrides = ConfigOverrides {
        mode,
        api_url: cli.api_url,
        api_token: cli.api_token,
        port: cli.port,
        log_level: cli.log_level,
        log_format: cli.log_format,
    };
    let config = config::load_config(cli.config.as_deref(), overrides)
        .context("Failed to load configuration")?;

    init_logging(config.mode, &config.logging)?;

    let client =
        TandoorClient::new(&config.tandoor).context("Failed to create Tandoor API client")?;

    print_banner(&config, &client);

    let shutdown = CancellationToken::new();
    tokio::spawn(api::shutdown_signal(shutdown.clone()));

    run(config, client, shutdown).await
}

async fn run(
    config: config::AppConfig,
    client: TandoorClient,
    shutdown: CancellationToken,
) -> Result<()> {
    if !config.mode.serves_http() {
        return mcp::serve_stdio(client, shutdown.child_token()).await;
    }

    if config.mode.serves_stdio() {
        let stdio_client = client.clone();
        let stdio_ct = shutdown.child_token();
        tokio::spawn(async move {
            if let Err(e) = mcp::serve_stdio(stdio_client, stdio_ct).await {
                error!("stdio MCP channel unavailable: {:#}", e);
            }
        });
    }

    api::start_server(&config.http, client, shutdown).await
}

fn init_logging(mode: TransportMode, config: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // stdout carries protocol frames in stdio mode; only errors reach stderr
    let env_filter = if mode == TransportMode::Stdio {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
    };

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        _ => {
            // Default to pretty format
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()?;
        }
    }

    Ok(())
}

fn print_banner(config: &config::AppConfig, client: &TandoorClient) {
    let version = env!("CARGO_PKG_VERSION");
    let width = 59usize;
    let border = "═".repeat(width + 2);
    let line = |content: &str| {
        info!("║ {:width$} ║", content, width = width);
    };

    info!("╔{}╗", border);
    line("TANDOOR-MCP");
    line(&format!("Tandoor MCP Server v{}", version));
    info!("╚{}╝", border);
    info!("");
    info!("Server Configuration:");
    info!("  → Transport: {}", config.mode);
    if config.mode.serves_http() {
        info!("  → Address: {}:{}", config.http.host, config.http.port);
    }
    info!("  → Tandoor API: {}", client.base_url());
    info!("  → Tools: {}", mcp::tools::tools().len());
    info!("  → Log Level: {}", config.logging.level);
    info!("  → Log Format: {}", config.logging.format);
    info!("");
}
