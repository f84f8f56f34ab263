// api-cli/src/commands/mod.rs
pub mod config;
pub mod request;

pub use config::{handle_config, ConfigCommands};
pub use request::{handle_request, handle_watch, RequestArgs};
