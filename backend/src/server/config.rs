//! HTTP server configuration object.

use std::net::SocketAddr;

use backend::outbound::persistence::PoolConfig;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) pool: PoolConfig,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, pool: PoolConfig) -> Self {
        Self { bind_addr, pool }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the pool configuration.
    #[must_use]
    pub fn pool(&self) -> &PoolConfig {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_its_parts() {
        let addr: SocketAddr = "0.0.0.0:8080".parse().expect("valid address");
        let config = ServerConfig::new(addr, PoolConfig::new("postgres://localhost/contacts"));

        assert_eq!(config.bind_addr(), addr);
        assert_eq!(config.pool().database_url(), "postgres://localhost/contacts");
    }
}
