//! Delta proxy configuration structures to map the `deltaproxy.toml` file.

#![deny(missing_docs)]

mod loader;
mod reports;
mod server;

use std::path::Path;

use serde::Deserialize;

pub use reports::ReportsConfig;
pub use server::ServerConfig;

/// Top-level configuration for the delta proxy.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration.
    pub server: ServerConfig,
    /// Report lifecycle timing configuration.
    pub reports: ReportsConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Validates the loaded configuration, e.g. positive timeouts.
    pub fn validate(&self) -> anyhow::Result<()> {
        loader::validate(self)
    }
}
