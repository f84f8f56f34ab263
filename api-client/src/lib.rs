pub mod client;
pub mod config;

pub use client::ApiClient;
pub use config::Config;

// Re-export the request factory for convenience
pub use api_factory;
