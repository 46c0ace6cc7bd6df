//! Server configuration
//!
//! Defaults to listening on `0.0.0.0:8080`. Two optional environment
//! variables override the listen address:
//!
//! ```text
//! TRAFFIC_BIND=127.0.0.1
//! TRAFFIC_PORT=9000
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use crate::error::{ServerError, ServerResult};

/// Default WebSocket port
pub const DEFAULT_PORT: u16 = 8080;

/// Listen settings for the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Variable overriding the bind address
    pub const BIND_VAR: &'static str = "TRAFFIC_BIND";

    /// Variable overriding the port
    pub const PORT_VAR: &'static str = "TRAFFIC_PORT";

    /// Load from the process environment
    pub fn from_env() -> ServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup(Self::BIND_VAR) {
            config.bind_addr = parse_var(Self::BIND_VAR, &bind)?;
        }
        if let Some(port) = lookup(Self::PORT_VAR) {
            config.port = parse_var(Self::PORT_VAR, &port)?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> ServerResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ServerError::Config(format!("{}={}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("TRAFFIC_BIND", "127.0.0.1"),
            ("TRAFFIC_PORT", " 9000 "),
        ]))
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup_from(&[("TRAFFIC_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(msg) if msg == "TRAFFIC_PORT=http"));
    }
}
