use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// `[basic]`: where the server listens and how loudly it logs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BasicConfig {
    /// Bind address. Default `0.0.0.0`.
    pub listen_addr: IpAddr,

    /// Bind port. Default `8000`.
    pub listen_port: u16,

    /// `EnvFilter` directive used when `RUST_LOG` is unset, e.g. `info` or
    /// `tablecast=debug,tower=warn`. Default `info`.
    pub loglevel: String,
}

impl BasicConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.listen_port)
    }
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            listen_port: 8000,
            loglevel: "info".to_string(),
        }
    }
}
