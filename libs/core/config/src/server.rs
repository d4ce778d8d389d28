use crate::{env_or_default, ConfigError, FromEnv};
use std::net::Ipv6Addr;

/// Listen address of the knowledge bank gRPC server
#[derive(Clone, Debug)]
pub struct KbsServerConfig {
    pub host: String,
    pub port: u16,
}

impl KbsServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for KbsServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - KBS_HOST: defaults to `[::1]` (IPv6 loopback)
    /// - KBS_PORT: defaults to 50051
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("KBS_HOST", &format!("[{}]", Ipv6Addr::LOCALHOST));
        let port = env_or_default("KBS_PORT", "50051").parse().map_err(|e| {
            ConfigError::ParseError {
                key: "KBS_PORT".to_string(),
                details: format!("{}", e),
            }
        })?;

        Ok(Self { host, port })
    }
}

impl Default for KbsServerConfig {
    fn default() -> Self {
        Self {
            host: format!("[{}]", Ipv6Addr::LOCALHOST),
            port: 50051,
        }
    }
}
