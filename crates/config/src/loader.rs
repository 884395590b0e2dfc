use std::path::Path;

use anyhow::{Context as _, bail};

use crate::Config;

/// Loads configuration from `path`, falling back to [`Config::default`] if
/// the file does not exist — a brand-new checkout with no `deltaproxy.toml`
/// on disk is expected to start with defaults, not fail to launch.
pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();

    let config = match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .with_context(|| format!("failed to parse config file at {}", path.display()))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::info!("no config file at {}, using built-in defaults", path.display());
            Config::default()
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read config file at {}", path.display()));
        }
    };

    validate(&config)?;

    Ok(config)
}

pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    if !config.server.use_node && config.server.static_root.is_none() {
        log::warn!(
            "server.static_root is not set and use_node is false; the consumer UI will not be served"
        );
    }

    if config.reports.throttle_secs <= 0.0 {
        bail!("reports.throttle_secs must be positive, got {}", config.reports.throttle_secs);
    }

    if config.reports.wait_for_connection_secs <= 0.0 {
        bail!(
            "reports.wait_for_connection_secs must be positive, got {}",
            config.reports.wait_for_connection_secs
        );
    }

    Ok(())
}
