use std::time::Duration;

use bytes::Bytes;

use crate::buffer::Buffer;
use crate::error::Result;
use crate::header::{AmsHeader, Header};
use crate::packet::{classify, Decode, Packet, PacketKind};
use crate::read::ReadResponse;
use crate::readstate::{ReadStateRequest, ReadStateResponse};
use crate::readwrite::ReadWriteResponse;
use crate::write::WriteResponse;

/// Default maximum frame size (envelope included): 64 KiB.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// How the byte stream is cut into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// Every successful read is treated as exactly one frame.
    ///
    /// Frames split across reads fail to decode, and a second frame
    /// coalesced into the same read is ignored.
    #[default]
    SingleRead,
    /// Frames are reassembled from the AMS/TCP envelope length.
    LengthPrefixed,
}

/// Configuration for frame reading and writing.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Maximum frame size in bytes. Default: 64 KiB.
    pub max_frame_size: usize,
    /// Framing strategy for inbound bytes.
    pub framing: Framing,
    /// Write timeout for a single frame.
    pub write_timeout: Option<Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            framing: Framing::default(),
            write_timeout: None,
        }
    }
}

/// Any response the client knows how to correlate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Read(ReadResponse),
    Write(WriteResponse),
    ReadWrite(ReadWriteResponse),
    ReadState(ReadStateResponse),
}

impl Response {
    pub fn kind(&self) -> PacketKind {
        match self {
            Self::Read(_) => PacketKind::ReadResponse,
            Self::Write(_) => PacketKind::WriteResponse,
            Self::ReadWrite(_) => PacketKind::ReadWriteResponse,
            Self::ReadState(_) => PacketKind::ReadStateResponse,
        }
    }

    pub fn header(&self) -> &AmsHeader {
        match self {
            Self::Read(p) => p.header(),
            Self::Write(p) => p.header(),
            Self::ReadWrite(p) => p.header(),
            Self::ReadState(p) => p.header(),
        }
    }

    pub fn invoke_id(&self) -> u32 {
        self.header().invoke_id
    }
}

macro_rules! response_variant {
    ($variant:ident, $ty:ty) => {
        impl From<$ty> for Response {
            fn from(packet: $ty) -> Self {
                Self::$variant(packet)
            }
        }

        impl TryFrom<Response> for $ty {
            type Error = Response;

            fn try_from(response: Response) -> std::result::Result<Self, Response> {
                match response {
                    Response::$variant(packet) => Ok(packet),
                    other => Err(other),
                }
            }
        }
    };
}

response_variant!(Read, ReadResponse);
response_variant!(Write, WriteResponse);
response_variant!(ReadWrite, ReadWriteResponse);
response_variant!(ReadState, ReadStateResponse);

/// A classified inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A reply to something this side sent.
    Response(Response),
    /// The peer is asking for our state.
    ReadStateRequest(ReadStateRequest),
    /// Header decoded but the (command, flags) pair is not handled.
    Unknown(Header),
}

/// Decode one inbound frame.
///
/// The envelope and AMS header are decoded first and classified; only
/// recognised shapes are decoded in full. A frame too short for the two
/// headers, or whose body is shorter than its length fields declare, is a
/// codec error.
pub fn decode_frame(data: &[u8]) -> Result<Frame> {
    let header = Header::from_bytes(data)?;
    let frame = match classify(&header.ams) {
        Some(PacketKind::ReadResponse) => {
            Frame::Response(Response::Read(ReadResponse::from_bytes(data)?))
        }
        Some(PacketKind::WriteResponse) => {
            Frame::Response(Response::Write(WriteResponse::from_bytes(data)?))
        }
        Some(PacketKind::ReadWriteResponse) => {
            Frame::Response(Response::ReadWrite(ReadWriteResponse::from_bytes(data)?))
        }
        Some(PacketKind::ReadStateResponse) => {
            Frame::Response(Response::ReadState(ReadStateResponse::from_bytes(data)?))
        }
        Some(PacketKind::ReadStateRequest) => {
            Frame::ReadStateRequest(ReadStateRequest::from_bytes(data)?)
        }
        _ => Frame::Unknown(header),
    };
    Ok(frame)
}

/// Encode a packet into one wire frame no larger than `max_frame_size`.
///
/// An oversized packet fails with [`CodecError::Overflow`](crate::CodecError::Overflow).
pub fn encode_frame<P: Packet>(packet: &P, max_frame_size: usize) -> Result<Bytes> {
    let mut buf = Buffer::with_limit(max_frame_size);
    packet.encode(&mut buf)?;
    buf.into_bytes()
}
