//! ReadWrite: send a payload and receive a payload in one exchange.

use bytes::Bytes;

use crate::addr::AmsAddr;
use crate::buffer::Buffer;
use crate::command;
use crate::error::Result;
use crate::flags::{has_state, ADS_COMMAND, RESPONSE};
use crate::header::{AmsHeader, AmsTcpHeader};
use crate::packet::{impl_packet, Decode, Encode, PacketKind, Request};

const REQUEST_FIXED_LEN: u32 = 16;
const RESPONSE_FIXED_LEN: u32 = 8;

/// AMS ReadWrite request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadWriteRequest {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
    pub index_group: u32,
    pub index_offset: u32,
    /// Number of bytes expected back.
    pub read_length: u32,
    /// Declared length of `data`.
    pub write_length: u32,
    pub data: Bytes,
}

impl ReadWriteRequest {
    pub fn new(
        target: AmsAddr,
        sender: AmsAddr,
        group: u32,
        offset: u32,
        read_length: u32,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        let write_length = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let body_len = REQUEST_FIXED_LEN.saturating_add(write_length);
        Self {
            tcp_header: AmsTcpHeader::for_body(body_len),
            header: AmsHeader {
                target,
                sender,
                command_id: command::READ_WRITE,
                state_flags: ADS_COMMAND,
                length: body_len,
                ..AmsHeader::default()
            },
            index_group: group,
            index_offset: offset,
            read_length,
            write_length,
            data,
        }
    }
}

impl Encode for ReadWriteRequest {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.write_u32(self.index_group);
        buf.write_u32(self.index_offset);
        buf.write_u32(self.read_length);
        buf.write_u32(self.write_length);
        buf.write_n(&self.data, self.write_length);
        buf.result()
    }
}

impl Decode for ReadWriteRequest {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let tcp_header = buf.read_struct();
        let header = buf.read_struct();
        let index_group = buf.read_u32();
        let index_offset = buf.read_u32();
        let read_length = buf.read_u32();
        let write_length = buf.read_u32();
        let data = buf.read_n(write_length as usize);
        buf.result().map(|()| Self {
            tcp_header,
            header,
            index_group,
            index_offset,
            read_length,
            write_length,
            data,
        })
    }
}

impl_packet!(ReadWriteRequest, PacketKind::ReadWriteRequest);

impl Request for ReadWriteRequest {
    type Response = ReadWriteResponse;
}

/// AMS ReadWrite response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadWriteResponse {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
    pub result: u32,
    pub length: u32,
    pub data: Bytes,
}

impl ReadWriteResponse {
    pub fn new(target: AmsAddr, sender: AmsAddr, result: u32, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let length = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let body_len = RESPONSE_FIXED_LEN.saturating_add(length);
        Self {
            tcp_header: AmsTcpHeader::for_body(body_len),
            header: AmsHeader {
                target,
                sender,
                command_id: command::READ_WRITE,
                state_flags: ADS_COMMAND | RESPONSE,
                length: body_len,
                ..AmsHeader::default()
            },
            result,
            length,
            data,
        }
    }
}

impl Encode for ReadWriteResponse {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.write_u32(self.result);
        buf.write_u32(self.length);
        buf.write_n(&self.data, self.length);
        buf.result()
    }
}

impl Decode for ReadWriteResponse {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let tcp_header = buf.read_struct();
        let header = buf.read_struct();
        let result = buf.read_u32();
        let length = buf.read_u32();
        let data = buf.read_n(length as usize);
        buf.result().map(|()| Self {
            tcp_header,
            header,
            result,
            length,
            data,
        })
    }
}

impl_packet!(ReadWriteResponse, PacketKind::ReadWriteResponse);

/// Returns true if the header describes a ReadWrite response.
pub fn is_read_write_response(header: &AmsHeader) -> bool {
    header.command_id == command::READ_WRITE && has_state(header, RESPONSE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ams_header, assert_codec, frame_bytes, sender, tcp_header, target};

    #[test]
    fn request_golden() {
        let request = ReadWriteRequest {
            tcp_header: tcp_header(),
            header: ams_header(),
            index_group: 0x1234_5678,
            index_offset: 0x2345_6789,
            read_length: 0x3456_7890,
            write_length: 3,
            data: Bytes::from_static(&[0x00, 0x01, 0x02]),
        };
        let wire = frame_bytes(&[
            0x78, 0x56, 0x34, 0x12, // index group
            0x89, 0x67, 0x45, 0x23, // index offset
            0x90, 0x78, 0x56, 0x34, // read length
            0x03, 0x00, 0x00, 0x00, // write length
            0x00, 0x01, 0x02, // data
        ]);
        assert_codec(&request, &wire);
    }

    #[test]
    fn response_golden() {
        let response = ReadWriteResponse {
            tcp_header: tcp_header(),
            header: ams_header(),
            result: 0x1234_5678,
            length: 3,
            data: Bytes::from_static(&[0x00, 0x01, 0x02]),
        };
        let wire = frame_bytes(&[
            0x78, 0x56, 0x34, 0x12, // result
            0x03, 0x00, 0x00, 0x00, // length
            0x00, 0x01, 0x02, // data
        ]);
        assert_codec(&response, &wire);
    }

    #[test]
    fn new_request_computes_lengths() {
        let request =
            ReadWriteRequest::new(target(), sender(), 0xF003, 0, 4, b"MAIN.counter".to_vec());
        assert_eq!(request.write_length, 12);
        assert_eq!(request.read_length, 4);
        assert_eq!(request.header.length, 16 + 12);
        assert_eq!(request.tcp_header.length, 32 + 16 + 12);
        assert_eq!(request.header.command_id, command::READ_WRITE);
    }

    #[test]
    fn predicate() {
        let response = ReadWriteResponse::new(target(), sender(), 0, vec![1]);
        assert!(is_read_write_response(&response.header));
        let request = ReadWriteRequest::new(target(), sender(), 0, 0, 1, Bytes::new());
        assert!(!is_read_write_response(&request.header));
    }
}
