mod commands;
mod output;

use anyhow::Result;
use api_factory::Method;
use api_client::ApiClient;
use clap::{Parser, Subcommand};
use commands::{handle_config, handle_request, handle_watch, ConfigCommands, RequestArgs};
use output::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "api")]
#[command(about = "Issue templated JSON API requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET, remaining params go to the query string
    Get(RequestArgs),
    /// DELETE, remaining params go to the query string
    Delete(RequestArgs),
    /// POST, remaining params go to a JSON body
    Post(RequestArgs),
    /// PUT, remaining params go to a JSON body
    Put(RequestArgs),
    /// Long-running GET that Ctrl-C cancels
    Watch(RequestArgs),
    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Client from the config file, with status events traced at debug level
fn connect() -> Result<ApiClient> {
    let client = ApiClient::from_config_file()?;
    let mut events = client.notifier().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            debug!(status = event.status, url = %event.url, "request settled");
        }
    });
    Ok(client)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Get(args) => handle_request(&connect()?, Method::Get, args).await?,
        Commands::Delete(args) => handle_request(&connect()?, Method::Delete, args).await?,
        Commands::Post(args) => handle_request(&connect()?, Method::Post, args).await?,
        Commands::Put(args) => handle_request(&connect()?, Method::Put, args).await?,
        Commands::Watch(args) => handle_watch(&connect()?, args).await?,
        Commands::Config(cmd) => handle_config(cmd)?,
    };

    if code != ExitCode::Success {
        std::process::exit(code.code());
    }
    Ok(())
}
