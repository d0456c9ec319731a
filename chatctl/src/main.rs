mod client;
mod commands;
mod config;
mod error;
mod output;
mod profile;

use clap::{Parser, Subcommand};
use commands::{config_cmd::ConfigCmd, profile::ProfileCmd};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatctl", version, about = "CLI for the e-commerce chatbot backend")]
struct Cli {
    /// Chatbot backend URL
    #[arg(long, env = "CHATBOT_URL", global = true)]
    server: Option<String>,

    /// Output format: table, json, yaml
    #[arg(short, long, env = "CHATBOT_OUTPUT", global = true)]
    output: Option<String>,

    /// Log filter, e.g. `warn` or `chatctl=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read or update user profiles
    Profile {
        #[command(subcommand)]
        cmd: ProfileCmd,
    },
    /// Check that the backend is up
    Health,
    /// Manage local configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
    /// Show version
    Version,
}

/// `--log-level` wins over `RUST_LOG`, which wins over the config file.
fn init_tracing(cli_level: Option<&str>, cfg_level: Option<&str>) {
    let filter = cli_level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .or_else(|| cfg_level.and_then(|l| EnvFilter::try_new(l).ok()))
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let cfg = config::ChatConfig::load();

    init_tracing(cli.log_level.as_deref(), cfg.log_level.as_deref());

    let server = cli
        .server
        .or(cfg.server)
        .unwrap_or_else(|| client::DEFAULT_BASE_URL.into());
    let output_format = cli
        .output
        .or(cfg.output)
        .unwrap_or_else(|| "table".into());

    let backend = client::BackendClient::new(server);
    let fetcher = profile::ProfileFetcher::new(backend.clone());

    let result = match cli.command {
        Commands::Profile { cmd } => commands::profile::run(cmd, &fetcher, &output_format).await,
        Commands::Health => commands::health::run(&backend, &output_format).await,
        Commands::Config { cmd } => commands::config_cmd::run(cmd, &output_format),
        Commands::Version => {
            println!("chatctl {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}
