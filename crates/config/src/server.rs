use serde::Deserialize;

/// HTTP server configuration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// TCP port the server binds.
    pub port: u16,
    /// Host used to construct the viewer-launch URL. Defaults to `localhost`.
    pub public_host: String,
    /// If true, defer static asset serving to an external dev server; the
    /// viewer URL targets that server instead of `static_root`.
    pub use_node: bool,
    /// Directory containing the UI bundle, served when `use_node` is false.
    pub static_root: Option<String>,
    /// Host of the external Node dev server, used for the viewer URL when
    /// `use_node` is true. Distinct from `public_host`, which is this
    /// proxy's own address — the two must never be conflated, or the
    /// viewer redirect loops back onto the proxy itself.
    pub dev_server_host: String,
    /// Port of the external Node dev server, used for the viewer URL when
    /// `use_node` is true.
    pub dev_server_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            public_host: "localhost".to_string(),
            use_node: false,
            static_root: None,
            dev_server_host: "localhost".to_string(),
            dev_server_port: 3000,
        }
    }
}
