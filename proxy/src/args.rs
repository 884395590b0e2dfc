use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments for the delta proxy binary.
#[derive(Debug, Parser)]
#[command(name = "deltaproxy", version, about = "Delta-streaming proxy between report producers and viewers")]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "./deltaproxy.toml")]
    pub config: PathBuf,

    /// Log filter string, e.g. `info` or `deltaproxy_server=debug`.
    #[arg(long, default_value = "info")]
    pub log_filter: String,

    /// Overrides `server.port` from the configuration file.
    #[arg(long)]
    pub port: Option<u16>,
}
