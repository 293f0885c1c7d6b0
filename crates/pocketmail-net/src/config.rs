//! Target server and gateway configuration.

use std::time::Duration;

use crate::transport::TransportKind;

/// Address of a carrier or WAP gateway used by the gateway transport kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    /// Gateway hostname.
    pub host: String,
    /// Gateway port.
    pub port: u16,
}

impl Gateway {
    /// Creates a gateway address.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Connection configuration: where to connect and over what.
///
/// The engine treats this as read-only input from the settings layer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target server hostname.
    pub host: String,
    /// Target server port.
    pub port: u16,
    /// Whether to wrap the stream in TLS at connect time.
    pub tls: bool,
    /// Carrier gateway address, if one is provisioned.
    pub carrier_gateway: Option<Gateway>,
    /// WAP gateway address, if one is provisioned.
    pub wap_gateway: Option<Gateway>,
    /// Per-dial timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Creates a configuration with defaults (no TLS upgrade decisions
    /// here: `tls` is plain on/off, as provided by settings).
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: false,
            carrier_gateway: None,
            wap_gateway: None,
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(host: impl Into<String>, port: u16) -> ConfigBuilder {
        ConfigBuilder::new(host, port)
    }

    /// Gateway address for a gateway transport kind, if provisioned.
    #[must_use]
    pub const fn gateway_for(&self, kind: TransportKind) -> Option<&Gateway> {
        match kind {
            TransportKind::CarrierGateway => self.carrier_gateway.as_ref(),
            TransportKind::WapGateway => self.wap_gateway.as_ref(),
            TransportKind::WiFi | TransportKind::Cellular => None,
        }
    }

    /// The URL this configuration resolves to for a given transport kind:
    /// `ssl://host:port` or `socket://host:port`, dialing the gateway
    /// address for gateway kinds.
    #[must_use]
    pub fn resolved_url(&self, kind: TransportKind) -> String {
        let scheme = if self.tls { "ssl" } else { "socket" };
        match self.gateway_for(kind) {
            Some(gw) => format!("{scheme}://{}:{}", gw.host, gw.port),
            None => format!("{scheme}://{}:{}", self.host, self.port),
        }
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder for the given target server.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            config: Config::new(host, port),
        }
    }

    /// Enables or disables TLS.
    #[must_use]
    pub const fn tls(mut self, tls: bool) -> Self {
        self.config.tls = tls;
        self
    }

    /// Sets the carrier gateway address.
    #[must_use]
    pub fn carrier_gateway(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.carrier_gateway = Some(Gateway::new(host, port));
        self
    }

    /// Sets the WAP gateway address.
    #[must_use]
    pub fn wap_gateway(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.wap_gateway = Some(Gateway::new(host, port));
        self
    }

    /// Sets the per-dial timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
