mod args;

use std::net::SocketAddr;

use args::Args;
use clap::Parser;
use config::Config;
use server::ServeConfig;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    let listen_address: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    let fatal = server::serve(ServeConfig {
        listen_address,
        config,
        shutdown_signal: CancellationToken::new(),
        log_filter: args.log_filter,
        bound_addr_sender: None,
    })
    .await?;

    if fatal {
        std::process::exit(1);
    }

    Ok(())
}
