//! ADS command ids and well-known protocol constants.
//!
//! Command ids are assigned sequentially by the protocol; their order matters.

pub const INVALID: u16 = 0;
pub const READ_DEVICE_INFO: u16 = 1;
pub const READ: u16 = 2;
pub const WRITE: u16 = 3;
pub const READ_STATE: u16 = 4;
pub const WRITE_CONTROL: u16 = 5;
pub const ADD_DEVICE_NOTIFICATION: u16 = 6;
pub const DELETE_DEVICE_NOTIFICATION: u16 = 7;
pub const DEVICE_NOTIFICATION: u16 = 8;
pub const READ_WRITE: u16 = 9;

/// Returns a human-readable name for a command id.
pub fn command_name(id: u16) -> &'static str {
    match id {
        INVALID => "Invalid",
        READ_DEVICE_INFO => "ReadDeviceInfo",
        READ => "Read",
        WRITE => "Write",
        READ_STATE => "ReadState",
        WRITE_CONTROL => "WriteControl",
        ADD_DEVICE_NOTIFICATION => "AddDeviceNotification",
        DELETE_DEVICE_NOTIFICATION => "DeleteDeviceNotification",
        DEVICE_NOTIFICATION => "DeviceNotification",
        READ_WRITE => "ReadWrite",
        _ => "Unknown",
    }
}

/// Header error codes.
pub mod error_code {
    pub const NO_ERROR: u32 = 0;
    pub const TARGET_MACHINE_NOT_FOUND: u32 = 7;
}

/// Index groups of the PLC ADS service.
pub mod index_group {
    pub const GET_SYM_HANDLE_BY_NAME: u32 = 0x0000_F003;
    pub const RESERVED: u32 = 0x0000_F004;
    pub const READ_WRITE_SYM_VALUE_BY_HANDLE: u32 = 0x0000_F005;
    pub const RELEASE_SYM_HANDLE: u32 = 0x0000_F006;
    pub const READ_I_WRITE_I: u32 = 0x0000_F020;
    pub const READ_IX_WRITE_IX: u32 = 0x0000_F021;
    pub const IO_IMAGE_RISIZE: u32 = 0x0000_F025;
    pub const READ_Q_WRITE_Q: u32 = 0x0000_F030;
    pub const READ_QX_WRITE_QX: u32 = 0x0000_F031;
    pub const IO_IMAGE_ROSIZE: u32 = 0x0000_F035;
    pub const SUMUP_READ: u32 = 0x0000_F080;
    pub const SUMUP_WRITE: u32 = 0x0000_F081;
    pub const SUMUP_READ_WRITE: u32 = 0x0000_F082;
}

/// Well-known AMS ports.
pub mod port {
    pub const AMS_ROUTER: u16 = 1;
    pub const TC3_PLC_RUNTIME_1: u16 = 851;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ids_are_sequential() {
        let ids = [
            INVALID,
            READ_DEVICE_INFO,
            READ,
            WRITE,
            READ_STATE,
            WRITE_CONTROL,
            ADD_DEVICE_NOTIFICATION,
            DELETE_DEVICE_NOTIFICATION,
            DEVICE_NOTIFICATION,
            READ_WRITE,
        ];
        for (expected, id) in ids.into_iter().enumerate() {
            assert_eq!(usize::from(id), expected);
        }
    }

    #[test]
    fn names() {
        assert_eq!(command_name(READ), "Read");
        assert_eq!(command_name(READ_WRITE), "ReadWrite");
        assert_eq!(command_name(0x42), "Unknown");
    }
}
