//! Shared golden fixtures for codec tests.

use std::fmt::Debug;

use crate::addr::AmsAddr;
use crate::header::{AmsHeader, AmsTcpHeader};
use crate::packet::{Decode, Encode};

pub fn target() -> AmsAddr {
    "1.2.3.4.5.6:1234".parse().unwrap()
}

pub fn sender() -> AmsAddr {
    "5.6.7.8.9.0:5678".parse().unwrap()
}

pub fn tcp_header() -> AmsTcpHeader {
    AmsTcpHeader {
        reserved: 0x1234,
        length: 0x1234_5678,
    }
}

pub fn tcp_header_bytes() -> Vec<u8> {
    vec![
        0x34, 0x12, // reserved
        0x78, 0x56, 0x34, 0x12, // length
    ]
}

pub fn ams_header() -> AmsHeader {
    AmsHeader {
        target: target(),
        sender: sender(),
        command_id: 0x1234,
        state_flags: 0x5678,
        length: 0x1234_5678,
        error_code: 0x3456_7890,
        invoke_id: 0x5678_9012,
    }
}

pub fn ams_header_bytes() -> Vec<u8> {
    vec![
        0x01, 0x02, 0x03, 0x04, 0x05, 0x06, // target net id
        0xd2, 0x04, // target port
        0x05, 0x06, 0x07, 0x08, 0x09, 0x00, // sender net id
        0x2e, 0x16, // sender port
        0x34, 0x12, // command id
        0x78, 0x56, // state flags
        0x78, 0x56, 0x34, 0x12, // length
        0x90, 0x78, 0x56, 0x34, // error code
        0x12, 0x90, 0x78, 0x56, // invoke id
    ]
}

/// Both headers followed by `body`.
pub fn frame_bytes(body: &[u8]) -> Vec<u8> {
    let mut wire = tcp_header_bytes();
    wire.extend_from_slice(&ams_header_bytes());
    wire.extend_from_slice(body);
    wire
}

/// Encode `value`, compare against `wire`, decode `wire` and compare back.
pub fn assert_codec<T>(value: &T, wire: &[u8])
where
    T: Encode + Decode + PartialEq + Debug,
{
    let encoded = value.to_bytes().expect("encode should succeed");
    assert_eq!(encoded.as_ref(), wire, "encoded bytes");

    let decoded = T::from_bytes(wire).expect("decode should succeed");
    assert_eq!(&decoded, value, "decoded value");
}
