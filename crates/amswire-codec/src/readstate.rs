//! ReadState: query the automation and device state of a peer.
//!
//! Unlike the other commands this one flows both ways: the client may ask
//! the device, and the device may ask the client.

use crate::addr::AmsAddr;
use crate::buffer::Buffer;
use crate::command;
use crate::error::Result;
use crate::flags::{has_state, ADS_COMMAND, RESPONSE};
use crate::header::{AmsHeader, AmsTcpHeader};
use crate::packet::{impl_packet, Decode, Encode, PacketKind, Request};

const RESPONSE_BODY_LEN: u32 = 8;

/// AMS ReadState request. Header only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadStateRequest {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
}

impl ReadStateRequest {
    pub fn new(target: AmsAddr, sender: AmsAddr) -> Self {
        Self {
            tcp_header: AmsTcpHeader::for_body(0),
            header: AmsHeader {
                target,
                sender,
                command_id: command::READ_STATE,
                state_flags: ADS_COMMAND,
                ..AmsHeader::default()
            },
        }
    }
}

impl Encode for ReadStateRequest {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.result()
    }
}

impl Decode for ReadStateRequest {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let tcp_header = buf.read_struct();
        let header = buf.read_struct();
        buf.result().map(|()| Self { tcp_header, header })
    }
}

impl_packet!(ReadStateRequest, PacketKind::ReadStateRequest);

impl Request for ReadStateRequest {
    type Response = ReadStateResponse;
}

/// AMS ReadState response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReadStateResponse {
    pub tcp_header: AmsTcpHeader,
    pub header: AmsHeader,
    pub result: u32,
    pub ads_state: u16,
    pub device_state: u16,
}

impl ReadStateResponse {
    pub fn new(
        target: AmsAddr,
        sender: AmsAddr,
        result: u32,
        ads_state: u16,
        device_state: u16,
    ) -> Self {
        Self {
            tcp_header: AmsTcpHeader::for_body(RESPONSE_BODY_LEN),
            header: AmsHeader {
                target,
                sender,
                command_id: command::READ_STATE,
                state_flags: ADS_COMMAND | RESPONSE,
                length: RESPONSE_BODY_LEN,
                ..AmsHeader::default()
            },
            result,
            ads_state,
            device_state,
        }
    }
}

impl Encode for ReadStateResponse {
    fn encode(&self, buf: &mut Buffer) -> Result<()> {
        buf.write_struct(&self.tcp_header);
        buf.write_struct(&self.header);
        buf.write_u32(self.result);
        buf.write_u16(self.ads_state);
        buf.write_u16(self.device_state);
        buf.result()
    }
}

impl Decode for ReadStateResponse {
    fn decode(buf: &mut Buffer) -> Result<Self> {
        let packet = Self {
            tcp_header: buf.read_struct(),
            header: buf.read_struct(),
            result: buf.read_u32(),
            ads_state: buf.read_u16(),
            device_state: buf.read_u16(),
        };
        buf.result().map(|()| packet)
    }
}

impl_packet!(ReadStateResponse, PacketKind::ReadStateResponse);

/// Returns true if the header is a ReadState request pushed by the peer.
///
/// The state flags must be exactly the ADS command bit; any extra bit
/// (broadcast, priority, ...) disqualifies the frame.
pub fn is_read_state_request(header: &AmsHeader) -> bool {
    header.command_id == command::READ_STATE && header.state_flags == ADS_COMMAND
}

/// Returns true if the header describes a ReadState response.
pub fn is_read_state_response(header: &AmsHeader) -> bool {
    header.command_id == command::READ_STATE && has_state(header, RESPONSE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::AMS_HEADER_LEN;
    use crate::testutil::{
        ams_header, ams_header_bytes, assert_codec, frame_bytes, sender, tcp_header,
        tcp_header_bytes, target,
    };

    #[test]
    fn new_response() {
        let got = ReadStateResponse::new(target(), sender(), 1, 2, 3);
        let want = ReadStateResponse {
            tcp_header: AmsTcpHeader {
                reserved: 0,
                length: AMS_HEADER_LEN + 8,
            },
            header: AmsHeader {
                target: target(),
                sender: sender(),
                command_id: command::READ_STATE,
                state_flags: ADS_COMMAND | RESPONSE,
                length: 8,
                ..AmsHeader::default()
            },
            result: 1,
            ads_state: 2,
            device_state: 3,
        };
        assert_eq!(got, want);
    }

    #[test]
    fn request_golden() {
        let request = ReadStateRequest {
            tcp_header: tcp_header(),
            header: ams_header(),
        };
        let mut wire = tcp_header_bytes();
        wire.extend_from_slice(&ams_header_bytes());
        assert_codec(&request, &wire);
    }

    #[test]
    fn response_golden() {
        let response = ReadStateResponse {
            tcp_header: tcp_header(),
            header: ams_header(),
            result: 0x1234_5678,
            ads_state: 0x5678,
            device_state: 0x9012,
        };
        let wire = frame_bytes(&[
            0x78, 0x56, 0x34, 0x12, // result
            0x78, 0x56, // ads state
            0x12, 0x90, // device state
        ]);
        assert_codec(&response, &wire);
    }

    #[test]
    fn new_request_is_recognised_as_remote_request() {
        let request = ReadStateRequest::new(target(), sender());
        assert_eq!(request.tcp_header.length, AMS_HEADER_LEN);
        assert_eq!(request.header.length, 0);
        assert!(is_read_state_request(&request.header));
        assert!(!is_read_state_response(&request.header));
    }
}
