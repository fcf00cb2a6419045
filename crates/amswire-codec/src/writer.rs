use std::io::{self, ErrorKind};

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::codec::{encode_frame, FrameConfig};
use crate::error::FrameError;
use crate::packet::Packet;

type Result<T> = std::result::Result<T, FrameError>;

/// Writes whole frames to any `AsyncWrite` stream.
///
/// Each call writes one complete frame and flushes; callers that share a
/// writer must serialize access themselves.
pub struct FrameWriter<W> {
    inner: W,
    config: FrameConfig,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: W) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: W, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Encode `packet` and write it as one frame.
    pub async fn write_packet<P: Packet>(&mut self, packet: &P) -> Result<()> {
        let frame = encode_frame(packet, self.config.max_frame_size)?;
        self.write_frame(&frame).await
    }

    /// Write an already-encoded frame.
    pub async fn write_frame(&mut self, frame: &[u8]) -> Result<()> {
        if frame.len() > self.config.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: frame.len(),
                max: self.config.max_frame_size,
            });
        }

        match self.config.write_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.write_and_flush(frame)).await {
                Ok(result) => result,
                Err(_) => Err(FrameError::Io(io::Error::new(
                    ErrorKind::TimedOut,
                    format!("frame write timed out after {limit:?}"),
                ))),
            },
            None => self.write_and_flush(frame).await,
        }
    }

    async fn write_and_flush(&mut self, frame: &[u8]) -> Result<()> {
        self.inner.write_all(frame).await.map_err(map_write_error)?;
        self.inner.flush().await.map_err(map_write_error)?;
        trace!(len = frame.len(), "wrote frame");
        Ok(())
    }

    /// Shut down the write direction of the stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.inner.shutdown().await.map_err(map_write_error)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

fn map_write_error(err: io::Error) -> FrameError {
    match err.kind() {
        ErrorKind::WriteZero | ErrorKind::BrokenPipe => FrameError::ConnectionClosed,
        _ => FrameError::Io(err),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::AsyncReadExt;

    use super::*;
    use crate::packet::Encode;
    use crate::read::ReadRequest;
    use crate::testutil::{sender, target};
    use crate::write::WriteRequest;
    use crate::CodecError;

    #[tokio::test]
    async fn writes_encoded_packet() {
        let request = ReadRequest::new(target(), sender(), 0x4020, 0, 4);
        let mut writer = FrameWriter::new(Vec::new());
        writer.write_packet(&request).await.unwrap();
        assert_eq!(writer.into_inner(), request.to_bytes().unwrap().to_vec());
    }

    #[tokio::test]
    async fn rejects_packet_over_limit() {
        let request = WriteRequest::new(target(), sender(), 0, 0, vec![0u8; 128]);
        let config = FrameConfig {
            max_frame_size: 100,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Vec::new(), config);
        let err = writer.write_packet(&request).await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::Codec(CodecError::Overflow { limit: 100, .. })
        ));
        assert!(writer.get_ref().is_empty());
    }

    #[tokio::test]
    async fn rejects_raw_frame_over_limit() {
        let config = FrameConfig {
            max_frame_size: 8,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(Vec::new(), config);
        let err = writer.write_frame(&[0u8; 9]).await.unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { size: 9, max: 8 }));
    }

    #[tokio::test]
    async fn closed_peer_reports_connection_closed() {
        let (tx, rx) = tokio::io::duplex(64);
        drop(rx);
        let mut writer = FrameWriter::new(tx);
        let err = writer.write_frame(&[1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[tokio::test]
    async fn write_timeout_fires_when_peer_stalls() {
        let (tx, _rx) = tokio::io::duplex(4);
        let config = FrameConfig {
            write_timeout: Some(Duration::from_millis(20)),
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(tx, config);
        let err = writer.write_frame(&[0u8; 64]).await.unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::TimedOut));
    }

    #[tokio::test]
    async fn shutdown_signals_eof() {
        let (tx, mut rx) = tokio::io::duplex(64);
        let mut writer = FrameWriter::new(tx);
        writer.write_frame(&[9]).await.unwrap();
        writer.shutdown().await.unwrap();

        let mut out = Vec::new();
        rx.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, vec![9]);
    }
}
