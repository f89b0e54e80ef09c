//! HTTP server configuration object and helpers.

use scholarlink::inbound::http::state::HttpStatePorts;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) ports: HttpStatePorts,
}

impl ServerConfig {
    /// Construct a server configuration over a fully wired ports bundle.
    #[must_use]
    pub fn new(bind_host: impl Into<String>, port: u16, ports: HttpStatePorts) -> Self {
        Self {
            bind_addr: (bind_host.into(), port),
            ports,
        }
    }

    /// Return the host and port the server will bind to.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Exercised by bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.bind_addr.0.as_str(), self.bind_addr.1)
    }
}
