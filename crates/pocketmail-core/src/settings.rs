//! Session settings supplied by the embedding application.
//!
//! The workers treat settings as read-only input: one [`Settings`] value
//! describes one server (retrieval or submission), and the caller hands a
//! clone to each spawned session.

use pocketmail_net::{Config, TransportPrefs};
use serde::{Deserialize, Serialize};

/// Address of a carrier or WAP gateway relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayAddress {
    /// Gateway host.
    pub host: String,
    /// Gateway port.
    pub port: u16,
}

/// Read-only configuration for one mail session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Permitted transport kinds as a raw bitmask
    /// (see [`TransportPrefs::from_bits`]).
    #[serde(default = "default_transports")]
    pub transports: u8,
    /// Whether to wrap the connection in TLS.
    #[serde(default)]
    pub tls: bool,
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Account username; empty means the session skips authentication.
    #[serde(default)]
    pub username: String,
    /// Account password.
    #[serde(default)]
    pub password: String,
    /// Largest body section that will be decoded for display, in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Carrier gateway relay, when the carrier transport kind is permitted.
    #[serde(default)]
    pub carrier_gateway: Option<GatewayAddress>,
    /// WAP gateway relay, when the WAP transport kind is permitted.
    #[serde(default)]
    pub wap_gateway: Option<GatewayAddress>,
}

fn default_transports() -> u8 {
    TransportPrefs::ALL.bits()
}

const fn default_max_body_size() -> usize {
    64 * 1024
}

impl Settings {
    /// Settings for a direct connection with everything else defaulted.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            transports: default_transports(),
            tls: false,
            host: host.into(),
            port,
            username: String::new(),
            password: String::new(),
            max_body_size: default_max_body_size(),
            carrier_gateway: None,
            wap_gateway: None,
        }
    }

    /// Permitted transport kinds.
    #[must_use]
    pub const fn prefs(&self) -> TransportPrefs {
        TransportPrefs::from_bits(self.transports)
    }

    /// Whether the session should authenticate.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }

    /// Connection-layer configuration for these settings.
    #[must_use]
    pub fn net_config(&self) -> Config {
        let mut builder = Config::builder(self.host.clone(), self.port).tls(self.tls);
        if let Some(gw) = &self.carrier_gateway {
            builder = builder.carrier_gateway(gw.host.clone(), gw.port);
        }
        if let Some(gw) = &self.wap_gateway {
            builder = builder.wap_gateway(gw.host.clone(), gw.port);
        }
        builder.build()
    }
}
