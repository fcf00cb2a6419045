use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CodecError, Result};
use crate::packet::{Decode, Encode};

/// Byte cursor with first-error-wins semantics for little-endian codecs.
///
/// Reads consume from the front, writes append to the back. The first
/// failure (a read past the end, or a write past the optional limit) is
/// latched; every later operation is skipped and returns a zero value, and
/// [`Buffer::err`] keeps reporting the original failure unchanged. Composed
/// encoders and decoders can therefore issue a run of field operations and
/// check the outcome once at the end.
#[derive(Debug, Default, Clone)]
pub struct Buffer {
    buf: BytesMut,
    limit: Option<usize>,
    err: Option<CodecError>,
}

impl Buffer {
    /// Create an empty, unbounded buffer for encoding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer that refuses to grow past `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: BytesMut::new(),
            limit: Some(limit),
            err: None,
        }
    }

    /// Create a buffer holding a copy of `data`, ready for decoding.
    pub fn from_slice(data: &[u8]) -> Self {
        Self {
            buf: BytesMut::from(data),
            limit: None,
            err: None,
        }
    }

    /// The unread content of the buffer.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of unread bytes.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no unread bytes remain.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The first error, if any.
    pub fn err(&self) -> Option<&CodecError> {
        self.err.as_ref()
    }

    /// `Ok(())` or a copy of the latched error.
    pub fn result(&self) -> Result<()> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Consume the buffer, returning its content or the latched error.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(self.buf.freeze()),
        }
    }

    /// Truncate the buffer to zero and clear the error.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.err = None;
    }

    fn fail(&mut self, err: CodecError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    /// Check that `n` more bytes can be read; latches `UnexpectedEof` if not.
    fn can_read(&mut self, n: usize) -> bool {
        if self.err.is_some() {
            return false;
        }
        if n > self.buf.len() {
            self.fail(CodecError::UnexpectedEof {
                needed: n,
                remaining: self.buf.len(),
            });
            return false;
        }
        true
    }

    /// Check that `n` more bytes can be written; latches `Overflow` if not.
    fn can_write(&mut self, n: usize) -> bool {
        if self.err.is_some() {
            return false;
        }
        if let Some(limit) = self.limit {
            let needed = self.buf.len().saturating_add(n);
            if needed > limit {
                self.fail(CodecError::Overflow { needed, limit });
                return false;
            }
        }
        true
    }

    /// Fill `dst` completely from the buffer. On failure `dst` is zeroed.
    pub fn read_exact(&mut self, dst: &mut [u8]) {
        if !self.can_read(dst.len()) {
            dst.fill(0);
            return;
        }
        self.buf.copy_to_slice(dst);
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.read_exact(&mut out);
        out
    }

    /// Read `n` bytes. Returns an empty slice on failure.
    pub fn read_n(&mut self, n: usize) -> Bytes {
        if !self.can_read(n) {
            return Bytes::new();
        }
        self.buf.split_to(n).freeze()
    }

    /// Read a little-endian `u16`.
    pub fn read_u16(&mut self) -> u16 {
        if !self.can_read(2) {
            return 0;
        }
        self.buf.get_u16_le()
    }

    /// Read a little-endian `u32`.
    pub fn read_u32(&mut self) -> u32 {
        if !self.can_read(4) {
            return 0;
        }
        self.buf.get_u32_le()
    }

    /// Read an IEEE-754 `f32` by reinterpreting its little-endian bits.
    pub fn read_f32(&mut self) -> f32 {
        f32::from_bits(self.read_u32())
    }

    /// Read `n` consecutive `u32` values. Returns an empty vector on failure.
    pub fn read_u32_vec(&mut self, n: usize) -> Vec<u32> {
        if !self.can_read(n.saturating_mul(4)) {
            return Vec::new();
        }
        (0..n).map(|_| self.buf.get_u32_le()).collect()
    }

    /// Read `n` consecutive `f32` values. Returns an empty vector on failure.
    pub fn read_f32_vec(&mut self, n: usize) -> Vec<f32> {
        self.read_u32_vec(n).into_iter().map(f32::from_bits).collect()
    }

    /// Decode a nested structure from the same cursor.
    ///
    /// Returns `T::default()` when an error is already latched or when the
    /// nested decode fails; the nested failure becomes the latched error.
    pub fn read_struct<T: Decode + Default>(&mut self) -> T {
        if self.err.is_some() {
            return T::default();
        }
        match T::decode(self) {
            Ok(value) => value,
            Err(err) => {
                self.fail(err);
                T::default()
            }
        }
    }

    /// Append `data`.
    pub fn write(&mut self, data: &[u8]) {
        if !self.can_write(data.len()) {
            return;
        }
        self.buf.put_slice(data);
    }

    /// Append at most `max` bytes of `data`.
    ///
    /// Equivalent to `write(&data[..max])` when `data` is longer than `max`.
    pub fn write_n(&mut self, data: &[u8], max: u32) {
        let max = usize::try_from(max).unwrap_or(usize::MAX);
        let end = data.len().min(max);
        self.write(&data[..end]);
    }

    /// Append a little-endian `u16`.
    pub fn write_u16(&mut self, n: u16) {
        if !self.can_write(2) {
            return;
        }
        self.buf.put_u16_le(n);
    }

    /// Append a little-endian `u32`.
    pub fn write_u32(&mut self, n: u32) {
        if !self.can_write(4) {
            return;
        }
        self.buf.put_u32_le(n);
    }

    /// Append an `f32` as its exact little-endian bit pattern.
    pub fn write_f32(&mut self, n: f32) {
        self.write_u32(n.to_bits());
    }

    /// Append all values without a length prefix.
    pub fn write_u32_slice(&mut self, values: &[u32]) {
        if !self.can_write(values.len().saturating_mul(4)) {
            return;
        }
        for &value in values {
            self.buf.put_u32_le(value);
        }
    }

    /// Append all values without a length prefix.
    pub fn write_f32_slice(&mut self, values: &[f32]) {
        if !self.can_write(values.len().saturating_mul(4)) {
            return;
        }
        for &value in values {
            self.buf.put_u32_le(value.to_bits());
        }
    }

    /// Encode a nested structure onto the same cursor.
    pub fn write_struct<T: Encode + ?Sized>(&mut self, value: &T) {
        if self.err.is_some() {
            return;
        }
        if let Err(err) = value.encode(self) {
            self.fail(err);
        }
    }
}
