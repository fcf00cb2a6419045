//! Binary codec and framing for the AMS/ADS automation protocol.
//!
//! Every frame on the wire is laid out as:
//! - a 6-byte AMS/TCP header (2 reserved bytes + 4-byte LE length)
//! - a 32-byte AMS header (addresses, command, state flags, invoke id)
//! - a command-specific body
//!
//! All integers are little-endian. Encoding and decoding go through the
//! sticky-error [`Buffer`], so multi-field codecs need no per-field checks.

pub mod addr;
pub mod buffer;
pub mod codec;
pub mod command;
pub mod error;
pub mod flags;
pub mod header;
pub mod packet;
pub mod read;
pub mod readstate;
pub mod reader;
pub mod readwrite;
pub mod write;
pub mod writer;

#[cfg(test)]
mod testutil;

pub use addr::{AddrParseError, AmsAddr, NetId};
pub use buffer::Buffer;
pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, Framing, Response, DEFAULT_MAX_FRAME_SIZE,
};
pub use error::{CodecError, FrameError, Result};
pub use header::{AmsHeader, AmsTcpHeader, Header, AMS_HEADER_LEN, TCP_HEADER_LEN};
pub use packet::{classify, Decode, Encode, Packet, PacketKind, Request};
pub use read::{ReadRequest, ReadResponse};
pub use reader::FrameReader;
pub use readstate::{ReadStateRequest, ReadStateResponse};
pub use readwrite::{ReadWriteRequest, ReadWriteResponse};
pub use write::{WriteRequest, WriteResponse};
pub use writer::FrameWriter;
