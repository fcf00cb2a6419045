//! Read: fetch `length` bytes from an index group/offset on the target.

use bytes::Bytes;

use crate::addr::AmsAddr;
use crate::buffer::Buffer;
use crate::command;
use crate::error::Result;
use crate::flags::{has_state, ADS_COMMAND, RESPONSE};
use crate::header::{AmsHeader, AmsTcpHeader};
use crate::packet::{impl_packet, Decode, Encode, PacketKind, Request};

const REQUEST_BODY_LEN: u32 = 12;
const RESPONSE_FIXED_LEN: u32 = 8;

/// AMS Read request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
    pub index_group: u32,
    pub index_offset: u32,
    /// Number of bytes requested.
    pub length: u32,
}

impl ReadRequest {
    pub fn new(target: AmsAddr, sender: AmsAddr, group: u32, offset: u32, length: u32) -> Self {
        Self {
            tcp_header: AmsTcpHeader::for_body(REQUEST_BODY_LEN),
            header: AmsHeader {
                target,
                sender,
                command_id: command::READ,
                state_flags: ADS_COMMAND,
                length: REQUEST_BODY_LEN,
                ..AmsHeader::default()
            },
            index_group: group,
            index_offset: offset,
            length,
        }
    }
}

impl Encode for ReadRequest {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.write_u32(self.index_group);
        buf.write_u32(self.index_offset);
        buf.write_u32(self.length);
        buf.result()
    }
}

impl Decode for ReadRequest {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let packet = Self {
            tcp_header: buf.read_struct(),
            header: buf.read_struct(),
            index_group: buf.read_u32(),
            index_offset: buf.read_u32(),
            length: buf.read_u32(),
        };
        buf.result().map(|()| packet)
    }
}

impl_packet!(ReadRequest, PacketKind::ReadRequest);

impl Request for ReadRequest {
    type Response = ReadResponse;
}

/// AMS Read response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
    /// Device-level result code; zero on success.
    pub result: u32,
    /// Declared payload length.
    pub length: u32,
    pub data: Bytes,
}

impl ReadResponse {
    /// Build a response as a device would send it.
    pub fn new(target: AmsAddr, sender: AmsAddr, result: u32, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        let length = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let body_len = RESPONSE_FIXED_LEN.saturating_add(length);
        Self {
            tcp_header: AmsTcpHeader::for_body(body_len),
            header: AmsHeader {
                target,
                sender,
                command_id: command::READ,
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

impl Encode for ReadResponse {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.write_u32(self.result);
        buf.write_u32(self.length);
        buf.write_n(&self.data, self.length);
        buf.result()
    }
}

impl Decode for ReadResponse {
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

impl_packet!(ReadResponse, PacketKind::ReadResponse);

/// Returns true if the header describes a Read response.
pub fn is_read_response(header: &AmsHeader) -> bool {
    header.command_id == command::READ && has_state(header, RESPONSE)
}
