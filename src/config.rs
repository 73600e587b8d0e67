//! Configuration management for the cast gateway
//!
//! Settings come from three layers, later layers winning: built-in defaults,
//! an optional TOML file (`cast-gateway.toml`), and environment variables.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

/// Default HTTP API port
const DEFAULT_PORT: u16 = 8080;

/// mDNS service type browsed for cast-capable devices
const DEFAULT_SERVICE_TYPE: &str = "_googlecast._tcp.local.";

/// Wait after issuing quit-app before launching media. Device-side app
/// teardown is asynchronous and the control protocol gives no "stopped"
/// confirmation, so the gateway settles for a fixed pause.
const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Path on this gateway that devices are pointed at
const DEFAULT_CALLBACK_PATH: &str = "/frontend/tv-view.html";

/// Cast gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP API listens on
    pub port: u16,

    /// Directory of static frontend assets (served under `/frontend`)
    pub static_dir: Option<PathBuf>,

    /// Upstream backend base URL for `/api/*` pass-through
    pub upstream_url: Option<String>,

    /// mDNS service type to browse for devices
    pub service_type: String,

    /// Settle delay applied after quit-app, before launching media
    pub settle_delay: Duration,

    /// Gateway path devices are told to render
    pub callback_path: String,

    /// Content type label sent with the cast URL
    pub cast_content_type: String,

    /// Display title sent with the cast URL
    pub cast_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            upstream_url: None,
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            callback_path: DEFAULT_CALLBACK_PATH.to_string(),
            cast_content_type: "text/html".to_string(),
            cast_title: "Ranking de Vendas".to_string(),
        }
    }
}

/// On-disk configuration file shape (all fields optional)
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    discovery: DiscoverySection,
    #[serde(default)]
    cast: CastSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    upstream_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DiscoverySection {
    service_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CastSection {
    settle_delay_ms: Option<u64>,
    callback_path: Option<String>,
    content_type: Option<String>,
    title: Option<String>,
}

impl Config {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides (`CAST_PORT`, `CAST_STATIC_DIR`, `CAST_UPSTREAM_URL`,
    /// `CAST_SERVICE_TYPE`, `CAST_SETTLE_DELAY_MS`).
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed, or if
    /// an override value is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path.filter(|p| p.exists()) {
            let raw = std::fs::read_to_string(path)?;
            let file: ConfigFile = toml::from_str(&raw)?;
            config.apply_file(file);
            tracing::debug!(path = %path.display(), "loaded configuration file");
        }

        config.apply_env()?;

        if let Some(upstream) = &config.upstream_url {
            url::Url::parse(upstream)
                .map_err(|e| Error::Config(format!("invalid upstream URL '{upstream}': {e}")))?;
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(port) = file.server.port {
            self.port = port;
        }
        if file.server.static_dir.is_some() {
            self.static_dir = file.server.static_dir;
        }
        if file.server.upstream_url.is_some() {
            self.upstream_url = file.server.upstream_url;
        }
        if let Some(service_type) = file.discovery.service_type {
            self.service_type = service_type;
        }
        if let Some(ms) = file.cast.settle_delay_ms {
            self.settle_delay = Duration::from_millis(ms);
        }
        if let Some(path) = file.cast.callback_path {
            self.callback_path = path;
        }
        if let Some(content_type) = file.cast.content_type {
            self.cast_content_type = content_type;
        }
        if let Some(title) = file.cast.title {
            self.cast_title = title;
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var("CAST_PORT") {
            self.port = port
                .parse()
                .map_err(|e| Error::Config(format!("invalid CAST_PORT '{port}': {e}")))?;
        }
        if let Ok(dir) = std::env::var("CAST_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Ok(upstream) = std::env::var("CAST_UPSTREAM_URL") {
            self.upstream_url = Some(upstream);
        }
        if let Ok(service_type) = std::env::var("CAST_SERVICE_TYPE") {
            self.service_type = service_type;
        }
        if let Ok(ms) = std::env::var("CAST_SETTLE_DELAY_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|e| Error::Config(format!("invalid CAST_SETTLE_DELAY_MS '{ms}': {e}")))?;
            self.settle_delay = Duration::from_millis(ms);
        }
        Ok(())
    }

    /// Build the URL devices are told to render, using the host's
    /// outward-facing IP address.
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("http://{}:{}{}", local_ip(), self.port, self.callback_path)
    }
}

/// Detect the host's outward-facing IP address.
///
/// Opens a UDP socket towards a public address to learn which local
/// interface the OS routes through; no packet is actually sent. Falls back
/// to the loopback address when detection fails.
#[must_use]
pub fn local_ip() -> IpAddr {
    let fallback = IpAddr::V4(Ipv4Addr::LOCALHOST);

    let Ok(socket) = UdpSocket::bind(("0.0.0.0", 0)) else {
        return fallback;
    };
    if socket.connect(("8.8.8.8", 80)).is_err() {
        return fallback;
    }
    socket.local_addr().map_or(fallback, |addr| addr.ip())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.service_type, "_googlecast._tcp.local.");
        assert_eq!(config.settle_delay, Duration::from_secs(2));
        assert_eq!(config.cast_content_type, "text/html");
    }

    #[test]
    fn file_values_override_defaults() {
        let file: ConfigFile = toml::from_str(
            r#"
            [server]
            port = 9090
            upstream_url = "http://localhost:3000"

            [cast]
            settle_delay_ms = 500
            title = "Painel"
            "#,
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(file);

        assert_eq!(config.port, 9090);
        assert_eq!(config.upstream_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.settle_delay, Duration::from_millis(500));
        assert_eq!(config.cast_title, "Painel");
        // untouched sections keep their defaults
        assert_eq!(config.service_type, "_googlecast._tcp.local.");
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        let mut config = Config::default();
        config.apply_file(file);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn callback_url_contains_port_and_path() {
        let config = Config::default();
        let url = config.callback_url();
        assert!(url.starts_with("http://"));
        assert!(url.contains(":8080"));
        assert!(url.ends_with("/frontend/tv-view.html"));
    }

    #[test]
    fn local_ip_never_panics() {
        // In sandboxed environments detection may fall back to loopback;
        // either way we get a usable address.
        let ip = local_ip();
        assert!(ip.is_ipv4() || ip.is_ipv6());
    }
}
