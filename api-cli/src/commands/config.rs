// api-cli/src/commands/config.rs
use crate::output::{print_header, print_response, ExitCode, Response};
use anyhow::Result;
use api_client::Config;
use serde_json::json;

#[derive(clap::Subcommand, Clone, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Set the base URL prefixed to every request
    SetBaseUrl {
        /// e.g. http://localhost:3000
        url: String,
    },
    /// Set the bearer token
    SetToken { token: String },
    /// Turn status notifications on or off by default
    Notifications {
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
}

pub fn handle_config(cmd: ConfigCommands) -> Result<ExitCode> {
    match cmd {
        ConfigCommands::Show => {
            let config = Config::load()?;
            print_header("Config file", &Config::config_path()?.display().to_string());
            print_header(
                "Base URL",
                if config.base_url.is_empty() {
                    "(none)"
                } else {
                    config.base_url.as_str()
                },
            );
            print_header(
                "Token",
                if config.token.is_some() { "set" } else { "not set" },
            );
            print_header(
                "Notifications",
                if config.no_event { "off" } else { "on" },
            );
            Ok(ExitCode::Success)
        }
        ConfigCommands::SetBaseUrl { url } => {
            let mut config = Config::load_file()?;
            config.base_url = url.trim_end_matches('/').to_string();
            config.save()?;
            print_response(&Response::ok(json!({"base_url": config.base_url})))?;
            Ok(ExitCode::Success)
        }
        ConfigCommands::SetToken { token } => {
            let mut config = Config::load_file()?;
            config.token = Some(token).filter(|t| !t.is_empty());
            config.save()?;
            print_response(&Response::ok(json!({"token": config.token.is_some()})))?;
            Ok(ExitCode::Success)
        }
        ConfigCommands::Notifications { state } => {
            let mut config = Config::load_file()?;
            config.no_event = state == "off";
            config.save()?;
            print_response(&Response::ok(json!({"notifications": state})))?;
            Ok(ExitCode::Success)
        }
    }
}
