use crate::addr::AmsAddr;
use crate::buffer::Buffer;
use crate::error::Result;
use crate::packet::{Decode, Encode};

/// Encoded size of [`AmsTcpHeader`].
pub const TCP_HEADER_LEN: u32 = 6;

/// Encoded size of [`AmsHeader`]: 2*8 + 2 + 2 + 4 + 4 + 4.
pub const AMS_HEADER_LEN: u32 = 32;

/// AMS/TCP envelope header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AmsTcpHeader {
    /// Must be zero.
    pub reserved: u16,
    /// Length of everything that follows this header.
    pub length: u32,
}

impl AmsTcpHeader {
    /// Envelope for an AMS header followed by a body of `body_len` bytes.
    pub fn for_body(body_len: u32) -> Self {
        Self {
            reserved: 0,
            length: AMS_HEADER_LEN.saturating_add(body_len),
        }
    }
}

impl Encode for AmsTcpHeader {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_u16(self.reserved);
        buf.write_u32(self.length);
        buf.result()
    }
}

impl Decode for AmsTcpHeader {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let reserved = buf.read_u16();
        let length = buf.read_u32();
        buf.result().map(|()| Self { reserved, length })
    }
}

/// AMS protocol header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AmsHeader {
    pub target: AmsAddr,
    pub sender: AmsAddr,
    pub command_id: u16,
    pub state_flags: u16,
    /// Length of the command body that follows.
    pub length: u32,
    pub error_code: u32,
    /// Correlation key linking a request to its response.
    pub invoke_id: u32,
}

impl Encode for AmsHeader {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.target);
        buf.write_struct(&self.sender);
        buf.write_u16(self.command_id);
        buf.write_u16(self.state_flags);
        buf.write_u32(self.length);
        buf.write_u32(self.error_code);
        buf.write_u32(self.invoke_id);
        buf.result()
    }
}

impl Decode for AmsHeader {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let header = Self {
            target: buf.read_struct(),
            sender: buf.read_struct(),
            command_id: buf.read_u16(),
            state_flags: buf.read_u16(),
            length: buf.read_u32(),
            error_code: buf.read_u32(),
            invoke_id: buf.read_u32(),
        };
        buf.result().map(|()| header)
    }
}

/// Envelope and AMS header together: everything needed to classify a frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub tcp: AmsTcpHeader,
    pub ams: AmsHeader,
}

impl Encode for Header {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp);
        buf.write_struct(&self.ams);
        buf.result()
    }
}

impl Decode for Header {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let tcp = buf.read_struct();
        let ams = buf.read_struct();
        buf.result().map(|()| Self { tcp, ams })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{
        ams_header, ams_header_bytes, assert_codec, tcp_header, tcp_header_bytes,
    };
    use crate::CodecError;

    #[test]
    fn tcp_header_golden() {
        assert_codec(&tcp_header(), &tcp_header_bytes());
    }

    #[test]
    fn ams_header_golden() {
        assert_codec(&ams_header(), &ams_header_bytes());
    }

    #[test]
    fn combined_header_golden() {
        let header = Header {
            tcp: tcp_header(),
            ams: ams_header(),
        };
        let mut wire = tcp_header_bytes();
        wire.extend_from_slice(&ams_header_bytes());
        assert_codec(&header, &wire);
    }

    #[test]
    fn truncated_header_fails_with_eof() {
        let wire = ams_header_bytes();
        let err = AmsHeader::from_bytes(&wire[..20]).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEof { .. }));
    }

    #[test]
    fn envelope_for_body() {
        let tcp = AmsTcpHeader::for_body(12);
        assert_eq!(tcp.reserved, 0);
        assert_eq!(tcp.length, AMS_HEADER_LEN + 12);
    }
}
