use std::fmt;

use bytes::Bytes;

use crate::buffer::Buffer;
use crate::codec::Response;
use crate::error::Result;
use crate::header::AmsHeader;
use crate::read::is_read_response;
use crate::readstate::{is_read_state_request, is_read_state_response};
use crate::readwrite::is_read_write_response;
use crate::write::is_write_response;

/// Types that can be encoded onto a [`Buffer`].
pub trait Encode {
    /// Append the encoded form to `buf`, returning the buffer's error state.
    fn encode(&self, buf: &mut Buffer) -> Result<()>;

    /// Encode into a fresh, unbounded buffer.
    fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = Buffer::new();
        self.encode(&mut buf)?;
        buf.into_bytes()
    }
}

/// Types that can be decoded from a [`Buffer`].
pub trait Decode: Sized {
    /// Consume the encoded form from the front of `buf`.
    fn decode(buf: &mut Buffer) -> Result<Self>;

    /// Decode from a byte slice. Trailing bytes are ignored.
    fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::decode(&mut Buffer::from_slice(data))
    }
}

/// The closed set of packet shapes this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    ReadRequest,
    ReadResponse,
    WriteRequest,
    WriteResponse,
    ReadWriteRequest,
    ReadWriteResponse,
    ReadStateRequest,
    ReadStateResponse,
}

impl PacketKind {
    /// Returns true for the response shapes.
    pub fn is_response(self) -> bool {
        matches!(
            self,
            Self::ReadResponse
                | Self::WriteResponse
                | Self::ReadWriteResponse
                | Self::ReadStateResponse
        )
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ReadRequest => "ReadRequest",
            Self::ReadResponse => "ReadResponse",
            Self::WriteRequest => "WriteRequest",
            Self::WriteResponse => "WriteResponse",
            Self::ReadWriteRequest => "ReadWriteRequest",
            Self::ReadWriteResponse => "ReadWriteResponse",
            Self::ReadStateRequest => "ReadStateRequest",
            Self::ReadStateResponse => "ReadStateResponse",
        };
        f.write_str(name)
    }
}

/// A complete AMS packet: envelope, AMS header and a typed body.
pub trait Packet: Encode + Decode + fmt::Debug + Send + 'static {
    /// The shape this type encodes.
    const KIND: PacketKind;

    /// The AMS header.
    fn header(&self) -> &AmsHeader;

    /// Mutable access to the AMS header (used to stamp invoke ids).
    fn header_mut(&mut self) -> &mut AmsHeader;
}

/// A packet the client sends and expects a typed reply to.
pub trait Request: Packet {
    /// The response shape expected for this request.
    type Response: Packet + TryFrom<Response, Error = Response>;
}

macro_rules! impl_packet {
    ($ty:ty, $kind:expr) => {
        impl $crate::packet::Packet for $ty {
            const KIND: $crate::packet::PacketKind = $kind;

            fn header(&self) -> &$crate::header::AmsHeader {
                &self.header
            }

            fn header_mut(&mut self) -> &mut $crate::header::AmsHeader {
                &mut self.header
            }
        }
    };
}

pub(crate) use impl_packet;

/// Classify an incoming frame from its AMS header alone.
///
/// Recognises the responses the client correlates and the ReadState request
/// the remote side may push. Anything else yields `None`.
pub fn classify(header: &AmsHeader) -> Option<PacketKind> {
    if is_read_response(header) {
        Some(PacketKind::ReadResponse)
    } else if is_write_response(header) {
        Some(PacketKind::WriteResponse)
    } else if is_read_write_response(header) {
        Some(PacketKind::ReadWriteResponse)
    } else if is_read_state_request(header) {
        Some(PacketKind::ReadStateRequest)
    } else if is_read_state_response(header) {
        Some(PacketKind::ReadStateResponse)
    } else {
        None
    }
}
