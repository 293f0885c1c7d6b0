//! Transport kinds, the permitted-kind bitmask, and failover attempt records.

use std::fmt;

/// One network path to reach a mail server.
///
/// Kinds are tried in the fixed order given by [`TransportKind::PRIORITY`]:
/// Wi-Fi first, then direct cellular TCP, then the carrier gateway, and the
/// WAP gateway last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Wi-Fi (direct socket over the WLAN bearer).
    WiFi,
    /// Direct cellular TCP (no intermediary).
    Cellular,
    /// Carrier-operated proxy gateway.
    CarrierGateway,
    /// WAP gateway.
    WapGateway,
}

impl TransportKind {
    /// Fixed priority order for failover.
    pub const PRIORITY: [Self; 4] = [
        Self::WiFi,
        Self::Cellular,
        Self::CarrierGateway,
        Self::WapGateway,
    ];

    /// Bit assigned to this kind in [`TransportPrefs`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::WiFi => 1,
            Self::Cellular => 1 << 1,
            Self::CarrierGateway => 1 << 2,
            Self::WapGateway => 1 << 3,
        }
    }

    /// Human-readable name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WiFi => "Wi-Fi",
            Self::Cellular => "cellular",
            Self::CarrierGateway => "carrier gateway",
            Self::WapGateway => "WAP gateway",
        }
    }

    /// Returns true if this kind dials through a configured gateway
    /// address rather than the target server directly.
    #[must_use]
    pub const fn is_gateway(self) -> bool {
        matches!(self, Self::CarrierGateway | Self::WapGateway)
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bitmask of permitted transport kinds.
///
/// The mask only says which kinds may be tried; the order is always
/// [`TransportKind::PRIORITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportPrefs(u8);

impl TransportPrefs {
    /// All transport kinds permitted.
    pub const ALL: Self = Self(0b1111);

    /// No transport kinds permitted.
    pub const NONE: Self = Self(0);

    /// Creates a preference mask from raw bits (unknown bits are ignored).
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bit representation, for storage in external settings.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if the given kind is permitted.
    #[must_use]
    pub const fn contains(self, kind: TransportKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Permits an additional kind.
    #[must_use]
    pub const fn with(self, kind: TransportKind) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Returns true if no kind is permitted.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Permitted kinds in fixed priority order.
    pub fn iter(self) -> impl Iterator<Item = TransportKind> {
        TransportKind::PRIORITY
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl Default for TransportPrefs {
    fn default() -> Self {
        Self::ALL
    }
}

/// Outcome of one failover step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Dial in progress.
    Pending,
    /// Dial succeeded; carries the resolved connection URL.
    Succeeded {
        /// Resolved connection URL (e.g. `ssl://mail.example.com:995`).
        url: String,
    },
    /// Dial failed; selection moves on to the next kind.
    Failed,
    /// Dial failed in a way that aborts the whole sequence.
    Aborted,
}

/// One failover step: which kind was tried, in what position, and how it
/// ended. Ephemeral: exists only while a connection is being established,
/// and is handed to the caller's attempt callback at each state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportAttempt {
    /// Transport kind tried in this step.
    pub kind: TransportKind,
    /// 1-based attempt number within the failover sequence.
    pub number: u32,
    /// Current outcome.
    pub outcome: AttemptOutcome,
    /// Captured error text, set for failed and aborted attempts.
    pub error: Option<String>,
}

impl TransportAttempt {
    /// Creates a pending attempt record.
    #[must_use]
    pub const fn new(kind: TransportKind, number: u32) -> Self {
        Self {
            kind,
            number,
            outcome: AttemptOutcome::Pending,
            error: None,
        }
    }
}
