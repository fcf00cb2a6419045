use std::time::Duration;

use amswire_codec::PacketKind;

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] amswire_transport::TransportError),

    /// A packet could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] amswire_codec::CodecError),

    /// Frame-level error while reading or writing the stream.
    #[error("frame error: {0}")]
    Frame(#[from] amswire_codec::FrameError),

    /// No response arrived within the deadline.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The caller abandoned the wait.
    #[error("request cancelled")]
    Cancelled,

    /// A response arrived for the invoke id but with the wrong shape.
    #[error("unexpected response: expected {expected}, got {got}")]
    UnexpectedResponse { expected: PacketKind, got: PacketKind },

    /// The device reported a non-zero error code.
    #[error("device returned error code {code:#x}")]
    Remote { code: u32 },

    /// The response carried fewer bytes than the operation needs.
    #[error("not enough data (needed {needed} bytes, got {got})")]
    ShortData { needed: usize, got: usize },

    /// The connection is gone; no further responses will arrive.
    #[error("disconnected: {0}")]
    Disconnected(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
