use std::net::{Ipv4Addr, SocketAddr, TcpListener};

/// Named ports of one test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ports {
    /// Port the mock backend listens on.
    pub backend_port: u16,
    /// Port the client connects to (the proxy in front of the backend).
    pub client_port: u16,
}

impl Ports {
    /// Client talks to the backend with no proxy in between.
    #[must_use]
    pub fn direct(port: u16) -> Self {
        Self {
            backend_port: port,
            client_port: port,
        }
    }

    /// Picks two distinct free local ports.
    ///
    /// The ports are only reserved while this call runs; another process may
    /// grab them before they are bound again.
    pub fn ephemeral() -> std::io::Result<Self> {
        let backend = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;
        let client = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))?;

        Ok(Self {
            backend_port: backend.local_addr()?.port(),
            client_port: client.local_addr()?.port(),
        })
    }
}

/// Read-only parameters shared by every step of a run.
#[derive(Debug, Clone)]
pub struct Params {
    pub ports: Ports,
}

impl Params {
    #[must_use]
    pub fn new(ports: Ports) -> Self {
        Self { ports }
    }

    #[must_use]
    pub fn backend_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.ports.backend_port))
    }

    #[must_use]
    pub fn client_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.ports.client_port))
    }
}
