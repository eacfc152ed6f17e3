//! Listener and storage settings loaded via OrthoConfig.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Server settings read from `LIFELOG_*` variables and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LIFELOG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. Without one the server keeps its data in
    /// memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection before failing the request.
    pub db_connect_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Return the configured listen address, falling back to
    /// [`DEFAULT_BIND_ADDR`].
    ///
    /// # Errors
    ///
    /// Returns the parse error when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Return the database URL when one is configured and not blank.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool settings for the configured database, if any. Limits left unset
    /// keep the [`PoolConfig`] defaults.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let mut config = PoolConfig::new(self.database_url()?);
        if let Some(max) = self.db_max_connections {
            config = config.with_max_size(max);
        }
        if let Some(secs) = self.db_connect_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }
}
