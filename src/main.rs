//! Adzuna MCP server - Main Entry Point
//!
//! Serves the Adzuna job search tools over MCP stdio by default. The other
//! subcommands inspect the tool set, run a single tool from the shell, or
//! check the configuration.

use adzuna_mcp::api::AdzunaClient;
use adzuna_mcp::config::{ConfigError, Credentials, ServerConfig};
use adzuna_mcp::observability::init_logging_from_env;
use adzuna_mcp::server::McpServer;
use adzuna_mcp::tools::ToolRegistry;
use adzuna_mcp::transport::serve_stdio;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn, Level};

/// MCP server exposing the Adzuna job search API
#[derive(Parser)]
#[command(name = "adzuna-mcp")]
#[command(about = "Model Context Protocol server for the Adzuna job search API")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server on stdin/stdout (default)
    Serve {
        /// Start even when Adzuna credentials are not set; every tool except
        /// get_api_version will then report the missing credentials
        #[arg(long)]
        allow_missing_credentials: bool,
    },
    /// Print the registered tools and their input schemas
    Tools,
    /// Invoke one tool and print its JSON result
    Call {
        /// Tool name, e.g. search_jobs
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, value_name = "JSON", default_value = "{}")]
        args: String,
    },
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["adzuna-mcp.toml", "config/adzuna-mcp.toml"];

#[tokio::main]
async fn main() {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => None,
        1 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    };
    init_logging_from_env(level);

    let config = match load_configuration(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Commands::Serve {
        allow_missing_credentials: false,
    });

    let result = match command {
        Commands::Serve {
            allow_missing_credentials,
        } => run_server(config, allow_missing_credentials).await,
        Commands::Tools => list_tools(config),
        Commands::Call { tool, args } => call_tool(config, &tool, &args).await,
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_configuration(config_path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    if let Some(path) = config_path {
        info!("Loading configuration from: {}", path.display());
        return ServerConfig::load_from_file(path);
    }

    for path_str in DEFAULT_CONFIG_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading configuration from: {}", path.display());
            return ServerConfig::load_from_file(path);
        }
    }

    info!("No configuration file found, using defaults");
    Ok(ServerConfig::default())
}

fn resolve_credentials(config: &ServerConfig) -> Option<Credentials> {
    match config.resolve_credentials() {
        Ok(credentials) => Some(credentials),
        Err(e) => {
            warn!("Adzuna credentials unavailable: {}", e);
            None
        }
    }
}

/// Wire the client, registry and server together
fn build_server(config: &ServerConfig, credentials: Option<Credentials>) -> CliResult<McpServer> {
    let client = AdzunaClient::new(config.api.client_settings(), credentials)?;
    let registry = ToolRegistry::adzuna(Arc::new(client))?;
    Ok(McpServer::new(Arc::new(registry), config.server.name.clone()))
}

async fn run_server(config: ServerConfig, allow_missing_credentials: bool) -> CliResult<()> {
    let credentials = resolve_credentials(&config);
    if credentials.is_none() && !allow_missing_credentials {
        return Err(format!(
            "Set {} and {} (environment or .env file), or pass --allow-missing-credentials",
            config.api.app_id_env, config.api.app_key_env
        )
        .into());
    }

    info!(
        "Starting {} v{} against {}",
        config.server.name,
        env!("CARGO_PKG_VERSION"),
        config.api.base_url
    );

    let server = build_server(&config, credentials)?;
    serve_stdio(Arc::new(server)).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn list_tools(config: ServerConfig) -> CliResult<()> {
    let server = build_server(&config, None)?;
    println!("{}", serde_json::to_string_pretty(&server.list_tools())?);
    Ok(())
}

async fn call_tool(config: ServerConfig, tool: &str, args: &str) -> CliResult<()> {
    let arguments: Value =
        serde_json::from_str(args).map_err(|e| format!("--args is not valid JSON: {e}"))?;

    let credentials = resolve_credentials(&config);
    let server = build_server(&config, credentials)?;
    let output = server.registry().execute_tool(tool, &arguments).await?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn handle_config_command(config: &ServerConfig, show: bool) -> CliResult<()> {
    config.api.validate()?;

    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(config)?);
        for name in [&config.api.app_id_env, &config.api.app_key_env] {
            let status = match std::env::var(name) {
                Ok(value) if !value.trim().is_empty() => "set",
                _ => "not set",
            };
            println!("# {name}: {status}");
        }
    }

    info!("Configuration validation complete");
    Ok(())
}
