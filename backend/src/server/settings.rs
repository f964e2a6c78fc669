//! Process settings loaded via OrthoConfig.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Listener, database and migration settings.
///
/// Values come from `PORTAL_*` environment variables, configuration files
/// and command-line flags, in OrthoConfig's usual precedence.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Listen address; defaults to all interfaces.
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    /// PostgreSQL URL. Accounts stay in process memory when unset.
    pub database_url: Option<String>,
    pub pool_max_size: Option<u32>,
    /// Skip embedded migrations at startup.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

impl PortalSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        SocketAddr::new(host, self.port.unwrap_or(DEFAULT_PORT))
    }

    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }
}
