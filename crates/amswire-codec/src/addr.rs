use std::fmt;
use std::str::FromStr;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::packet::{Decode, Encode};

/// Six-byte hierarchical AMS device identifier (the "AMS NetId").
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetId(pub [u8; 6]);

impl NetId {
    /// Create a NetId from its six components.
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// The six components.
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for NetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a}.{b}.{c}.{d}.{e}.{g}")
    }
}

/// An AMS endpoint: NetId plus 16-bit AMS port.
///
/// Textual form is `a.b.c.d.e.f:port`; binary form is the six NetId bytes
/// followed by the little-endian port.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AmsAddr {
    pub net_id: NetId,
    pub port: u16,
}

impl AmsAddr {
    /// Create an address from a NetId and port.
    pub const fn new(net_id: NetId, port: u16) -> Self {
        Self { net_id, port }
    }
}

impl fmt::Display for AmsAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.net_id, self.port)
    }
}

/// Error returned when an AMS address string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddrParseError {
    /// The string is not `a.b.c.d.e.f:port`.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The port is missing or outside 0-65535.
    #[error("invalid port: {0}")]
    InvalidPort(String),
}

impl FromStr for AmsAddr {
    type Err = AddrParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (net_id, port) = s
            .split_once(':')
            .ok_or_else(|| AddrParseError::InvalidAddress(s.to_string()))?;

        let mut octets = [0u8; 6];
        let mut parts = net_id.split('.');
        for octet in &mut octets {
            *octet = parts
                .next()
                .filter(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|part| part.parse::<u8>().ok())
                .ok_or_else(|| AddrParseError::InvalidAddress(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(AddrParseError::InvalidAddress(s.to_string()));
        }

        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddrParseError::InvalidPort(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| AddrParseError::InvalidPort(s.to_string()))?;

        Ok(Self::new(NetId(octets), port))
    }
}

impl Encode for AmsAddr {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write(&self.net_id.0);
        buf.write_u16(self.port);
        buf.result()
    }
}

impl Decode for AmsAddr {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let net_id = NetId(buf.read_array::<6>());
        let port = buf.read_u16();
        buf.result().map(|()| Self { net_id, port })
    }
}
