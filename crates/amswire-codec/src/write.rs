//! Write: store a payload at an index group/offset on the target.

use bytes::Bytes;

use crate::addr::AmsAddr;
use crate::buffer::Buffer;
use crate::command;
use crate::error::Result;
use crate::flags::{has_state, ADS_COMMAND, RESPONSE};
use crate::header::{AmsHeader, AmsTcpHeader};
use crate::packet::{impl_packet, Decode, Encode, PacketKind, Request};

const REQUEST_FIXED_LEN: u32 = 12;
const RESPONSE_BODY_LEN: u32 = 4;

/// AMS Write request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
    pub index_group: u32,
    pub index_offset: u32,
    /// Declared payload length.
    pub length: u32,
    pub data: Bytes,
}

impl WriteRequest {
    pub fn new(
        target: AmsAddr,
        sender: AmsAddr,
        group: u32,
        offset: u32,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        let length = u32::try_from(data.len()).unwrap_or(u32::MAX);
        let body_len = REQUEST_FIXED_LEN.saturating_add(length);
        Self {
            tcp_header: AmsTcpHeader::for_body(body_len),
            header: AmsHeader {
                target,
                sender,
                command_id: command::WRITE,
                state_flags: ADS_COMMAND,
                length: body_len,
                ..AmsHeader::default()
            },
            index_group: group,
            index_offset: offset,
            length,
            data,
        }
    }
}

impl Encode for WriteRequest {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.write_u32(self.index_group);
        buf.write_u32(self.index_offset);
        buf.write_u32(self.length);
        buf.write_n(&self.data, self.length);
        buf.result()
    }
}

impl Decode for WriteRequest {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let tcp_header = buf.read_struct();
        let header = buf.read_struct();
        let index_group = buf.read_u32();
        let index_offset = buf.read_u32();
        let length = buf.read_u32();
        let data = buf.read_n(length as usize);
        buf.result().map(|()| Self {
            tcp_header,
            header,
            index_group,
            index_offset,
            length,
            data,
        })
    }
}

impl_packet!(WriteRequest, PacketKind::WriteRequest);

impl Request for WriteRequest {
    type Response = WriteResponse;
}

/// AMS Write response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WriteResponse {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
    pub result: u32,
}

impl WriteResponse {
    pub fn new(target: AmsAddr, sender: AmsAddr, result: u32) -> Self {
        Self {
            tcp_header: AmsTcpHeader::for_body(RESPONSE_BODY_LEN),
            header: AmsHeader {
                target,
                sender,
                command_id: command::WRITE,
                state_flags: ADS_COMMAND | RESPONSE,
                length: RESPONSE_BODY_LEN,
                ..AmsHeader::default()
            },
            result,
        }
    }
}

impl Encode for WriteResponse {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.write_u32(self.result);
        buf.result()
    }
}

impl Decode for WriteResponse {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let packet = Self {
            tcp_header: buf.read_struct(),
            header: buf.read_struct(),
            result: buf.read_u32(),
        };
        buf.result().map(|()| packet)
    }
}

impl_packet!(WriteResponse, PacketKind::WriteResponse);

/// Returns true if the header describes a Write response.
pub fn is_write_response(header: &AmsHeader) -> bool {
    header.command_id == command::WRITE && has_state(header, RESPONSE)
}
