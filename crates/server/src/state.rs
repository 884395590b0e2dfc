use std::net::SocketAddr;
use std::sync::Arc;

use config::Config;
use dpcore::{Registry, Supervisor, ViewerLauncher};

/// Launches a viewer by logging the URL a browser would be pointed at.
///
/// The source launches an actual browser process; that mechanism has no
/// counterpart anywhere in this crate's dependency stack, so it is reduced
/// to its observable effect (an operator sees the URL and can open it).
pub struct LoggingViewerLauncher {
    pub listen_address: SocketAddr,
    pub public_host: String,
    pub use_node: bool,
    pub dev_server_host: String,
    pub dev_server_port: u16,
}

impl ViewerLauncher for LoggingViewerLauncher {
    fn launch(&self, report_name: &str) {
        let (host, port) = if self.use_node {
            (self.dev_server_host.as_str(), self.dev_server_port)
        } else {
            (self.public_host.as_str(), self.listen_address.port())
        };

        log::info!("report '{report_name}' is live: http://{host}:{port}/report/{report_name}");
    }
}

/// Shared state handed to every axum handler.
#[derive(Clone)]
pub struct AppState(Arc<AppInner>);

struct AppInner {
    registry: Registry,
    supervisor: Supervisor,
    config: Config,
}

impl AppState {
    pub fn new(config: Config, supervisor: Supervisor) -> Self {
        Self(Arc::new(AppInner {
            registry: Registry::new(),
            supervisor,
            config,
        }))
    }

    pub fn registry(&self) -> &Registry {
        &self.0.registry
    }

    pub fn supervisor(&self) -> &Supervisor {
        &self.0.supervisor
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }
}
