//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Only the bind address is required to
//! be well-formed; every other knob falls back to its default.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::PresenceError;

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Directory holding the static client bundle.
    pub static_dir: PathBuf,

    /// Seconds between liveness pings.
    pub ping_interval_secs: u64,

    /// Seconds of silence after which a connection is dropped.
    pub ping_timeout_secs: u64,

    /// Capacity of each connection's outbound queue.
    pub outbound_buffer: usize,

    /// Tracing output format.
    pub log_format: LogFormat,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            static_dir: PathBuf::from("static"),
            ping_interval_secs: 25,
            ping_timeout_secs: 60,
            outbound_buffer: 256,
            log_format: LogFormat::Text,
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`PresenceError::Config`] if `LISTEN_ADDR` is set but cannot
    /// be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, PresenceError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, PresenceError> {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|e| PresenceError::Config(format!("LISTEN_ADDR={raw}: {e}")))?,
            None => defaults.listen_addr,
        };

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            static_dir,
            ping_interval_secs: parse_or(&lookup, "PING_INTERVAL_SECS", defaults.ping_interval_secs),
            ping_timeout_secs: parse_or(&lookup, "PING_TIMEOUT_SECS", defaults.ping_timeout_secs),
            outbound_buffer: parse_or(&lookup, "OUTBOUND_BUFFER", defaults.outbound_buffer),
            log_format,
        })
    }
}

/// Parses `key` as `T`, returning `default` on missing or invalid values.
fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
