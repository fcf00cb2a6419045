use std::io::ErrorKind;

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::codec::{FrameConfig, Framing};
use crate::error::FrameError;
use crate::header::{AmsTcpHeader, TCP_HEADER_LEN};
use crate::packet::Decode;

const READ_CHUNK_SIZE: usize = 8 * 1024;

type Result<T> = std::result::Result<T, FrameError>;

/// Reads raw frames from any `AsyncRead` stream.
///
/// How frame boundaries are found depends on [`Framing`]. With
/// `LengthPrefixed` partial reads are handled internally and callers always
/// get complete frames.
pub struct FrameReader<R> {
    inner: R,
    buf: BytesMut,
    config: FrameConfig,
}

impl<R: AsyncRead + Unpin> FrameReader<R> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: R, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
            config,
        }
    }

    /// Read the next frame.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub async fn read_frame(&mut self) -> Result<Bytes> {
        match self.config.framing {
            Framing::SingleRead => self.read_single().await,
            Framing::LengthPrefixed => self.read_prefixed().await,
        }
    }

    async fn read_single(&mut self) -> Result<Bytes> {
        let mut data = BytesMut::zeroed(self.config.max_frame_size);
        loop {
            match self.inner.read(&mut data).await {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => {
                    trace!(len = n, "read frame");
                    data.truncate(n);
                    return Ok(data.freeze());
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    async fn read_prefixed(&mut self) -> Result<Bytes> {
        loop {
            if let Some(frame) = self.split_frame()? {
                trace!(len = frame.len(), "read frame");
                return Ok(frame);
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk).await {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&chunk[..read]);
        }
    }

    /// Split one complete frame off the front of the buffer, if present.
    fn split_frame(&mut self) -> Result<Option<Bytes>> {
        let header_len = TCP_HEADER_LEN as usize;
        if self.buf.len() < header_len {
            return Ok(None);
        }

        let envelope = AmsTcpHeader::from_bytes(&self.buf[..header_len])?;
        let total = header_len.saturating_add(envelope.length as usize);
        if total > self.config.max_frame_size {
            return Err(FrameError::FrameTooLarge {
                size: total,
                max: self.config.max_frame_size,
            });
        }

        if self.buf.len() < total {
            return Ok(None);
        }
        Ok(Some(self.buf.split_to(total).freeze()))
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncWriteExt;

    use super::*;
    use crate::codec::{decode_frame, Frame, Response, DEFAULT_MAX_FRAME_SIZE};
    use crate::packet::Encode;
    use crate::testutil::{sender, target};
    use crate::write::WriteResponse;
    use crate::ReadResponse;

    fn prefixed() -> FrameConfig {
        FrameConfig {
            framing: Framing::LengthPrefixed,
            ..FrameConfig::default()
        }
    }

    fn wire(result: u32) -> Bytes {
        WriteResponse::new(target(), sender(), result)
            .to_bytes()
            .unwrap()
    }

    #[tokio::test]
    async fn single_read_returns_what_one_read_delivers() {
        let bytes = wire(1);
        let mut reader = FrameReader::new(&bytes[..]);
        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame, bytes);
    }

    #[tokio::test]
    async fn single_read_treats_each_read_as_one_frame() {
        let (mut tx, rx) = tokio::io::duplex(4096);
        let mut reader = FrameReader::new(rx);

        tx.write_all(&wire(1)).await.unwrap();
        let first = reader.read_frame().await.unwrap();
        tx.write_all(&wire(2)).await.unwrap();
        let second = reader.read_frame().await.unwrap();

        assert_eq!(first, wire(1));
        assert_eq!(second, wire(2));
    }

    #[tokio::test]
    async fn single_read_keeps_coalesced_trailing_bytes_in_frame() {
        let mut both = wire(1).to_vec();
        both.extend_from_slice(&wire(2));
        let mut reader = FrameReader::new(both.as_slice());

        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame.len(), both.len());
        match decode_frame(&frame).unwrap() {
            Frame::Response(Response::Write(p)) => assert_eq!(p.result, 1),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    #[tokio::test]
    async fn single_read_is_bounded_by_max_frame_size() {
        let bytes = wire(1);
        let config = FrameConfig {
            max_frame_size: 10,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(&bytes[..], config);
        let frame = reader.read_frame().await.unwrap();
        assert_eq!(frame.len(), 10);
    }

    #[tokio::test]
    async fn length_prefixed_splits_coalesced_frames() {
        let mut both = wire(1).to_vec();
        both.extend_from_slice(&wire(2));
        let mut reader = FrameReader::with_config(both.as_slice(), prefixed());

        assert_eq!(reader.read_frame().await.unwrap(), wire(1));
        assert_eq!(reader.read_frame().await.unwrap(), wire(2));
        assert!(matches!(
            reader.read_frame().await.unwrap_err(),
            FrameError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn length_prefixed_reassembles_partial_reads() {
        let bytes = ReadResponse::new(target(), sender(), 0, vec![7u8; 300])
            .to_bytes()
            .unwrap();
        let (mut tx, rx) = tokio::io::duplex(16);
        let mut reader = FrameReader::with_config(rx, prefixed());

        let expected = bytes.clone();
        let writer = tokio::spawn(async move {
            for chunk in bytes.chunks(5) {
                tx.write_all(chunk).await.unwrap();
            }
        });

        let frame = reader.read_frame().await.unwrap();
        writer.await.unwrap();
        assert_eq!(frame, expected);
    }

    #[tokio::test]
    async fn length_prefixed_rejects_oversized_frames() {
        let bytes = ReadResponse::new(target(), sender(), 0, vec![0u8; 200])
            .to_bytes()
            .unwrap();
        let config = FrameConfig {
            max_frame_size: 64,
            ..prefixed()
        };
        let mut reader = FrameReader::with_config(&bytes[..], config);
        let err = reader.read_frame().await.unwrap_err();
        assert!(matches!(
            err,
            FrameError::FrameTooLarge { size, max: 64 } if size == bytes.len()
        ));
    }

    #[tokio::test]
    async fn length_prefixed_closed_mid_frame() {
        let bytes = wire(3);
        let partial = &bytes[..bytes.len() - 2];
        let mut reader = FrameReader::with_config(partial, prefixed());
        assert!(matches!(
            reader.read_frame().await.unwrap_err(),
            FrameError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn connection_closed_cleanly() {
        let mut reader = FrameReader::new(&[][..]);
        assert!(matches!(
            reader.read_frame().await.unwrap_err(),
            FrameError::ConnectionClosed
        ));
    }

    #[tokio::test]
    async fn accessors() {
        let reader = FrameReader::new(&[][..]);
        assert_eq!(reader.config().max_frame_size, DEFAULT_MAX_FRAME_SIZE);
        let _ = reader.get_ref();
        let _ = reader.into_inner();
    }
}
