//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use lifelog_backend::outbound::persistence::DbPool;
use lifelog_backend::settings::AuthSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) auth: AuthSettings,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Configuration that keeps data in memory until a pool is attached.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, auth: AuthSettings) -> Self {
        Self {
            bind_addr,
            auth,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, the server stores tags, activities and expenses in
    /// PostgreSQL instead of memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[cfg_attr(
        not(any(test, doctest)),
        expect(dead_code, reason = "Exercised by the bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
