//! Delta proxy server library.
//!
//! Provides a reusable `serve` function so both the proxy binary and the
//! integration tests can spin up the same router.

#![deny(missing_docs)]

mod consumer;
pub mod error;
pub mod logger;
mod producer;
mod state;
mod ui;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use config::Config;
use dpcore::Supervisor;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub use state::AppState;

/// Configuration for serving the proxy.
pub struct ServeConfig {
    /// The socket address the server binds to.
    pub listen_address: SocketAddr,
    /// The deserialized proxy configuration.
    pub config: Config,
    /// Cancellation token observed alongside the supervisor's own shutdown
    /// signal; lets a test harness force shutdown externally.
    pub shutdown_signal: CancellationToken,
    /// Log filter string, e.g. `"info"` or `"deltaproxy_server=debug"`.
    pub log_filter: String,
    /// Optional sender for the bound address, useful when port 0 was given.
    pub bound_addr_sender: Option<tokio::sync::oneshot::Sender<SocketAddr>>,
}

/// Starts and runs the proxy server. Returns `Ok(true)` if shutdown was
/// triggered by a fatal error, `Ok(false)` on a clean shutdown (the registry
/// became empty). Callers map this to the process exit code.
pub async fn serve(
    ServeConfig {
        listen_address,
        config,
        shutdown_signal,
        log_filter,
        bound_addr_sender,
    }: ServeConfig,
) -> anyhow::Result<bool> {
    logger::init(&log_filter);

    let launcher = state::LoggingViewerLauncher {
        listen_address,
        public_host: config.server.public_host.clone(),
        use_node: config.server.use_node,
        dev_server_host: config.server.dev_server_host.clone(),
        dev_server_port: config.server.dev_server_port,
    };
    let supervisor = Supervisor::new(Box::new(launcher));
    let app_state = AppState::new(config, supervisor);

    let mut app = Router::new()
        .route("/new/{local_id}/{report_name}", get(producer::handler))
        .route("/stream/{report_name}", get(consumer::handler))
        .route("/report/{report_name}", get(ui::handler));

    if let Some(static_router) = ui::static_router(&app_state) {
        app = app.merge(static_router);
    }

    let app = app.with_state(app_state.clone());

    let listener = TcpListener::bind(listen_address)
        .await
        .map_err(|e| error::Error::Bind(listen_address, e))?;

    if let Some(sender) = bound_addr_sender {
        let _ = sender.send(listener.local_addr()?);
    }

    log::info!("delta proxy listening on {listen_address}");

    let supervisor_token = app_state.supervisor().shutdown_token();

    tokio::select! {
        result = axum::serve(listener, app) => {
            result.map_err(error::Error::Server)?;
        }
        _ = supervisor_token.cancelled() => {
            log::info!("registry empty or fatal error signalled, shutting down");
        }
        _ = shutdown_signal.cancelled() => {
            log::info!("external shutdown signal received");
        }
    }

    Ok(app_state.supervisor().is_fatal())
}
