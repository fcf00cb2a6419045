/// Errors latched by the sticky-error [`Buffer`](crate::Buffer).
///
/// Cheap to clone so the buffer can hand the original failure back verbatim
/// every time it is asked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A read asked for more bytes than remain in the buffer.
    #[error("unexpected end of data (needed {needed} bytes, {remaining} remaining)")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A write would grow the buffer past its configured limit.
    #[error("short write ({needed} bytes exceeds limit of {limit})")]
    Overflow { needed: usize, limit: usize },
}

/// Errors that can occur while reading or writing whole frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A frame exceeds the configured maximum frame size.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed by the remote side.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, CodecError>;
