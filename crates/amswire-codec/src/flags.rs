//! AMS header state flags and ADS device states.

use crate::header::AmsHeader;

/// Frame is a response. Absence marks a request.
pub const RESPONSE: u16 = 1 << 0;
pub const NO_RETURN: u16 = 1 << 1;
/// Frame carries an ADS command.
pub const ADS_COMMAND: u16 = 1 << 2;
pub const SYSTEM_COMMAND: u16 = 1 << 3;
pub const HIGH_PRIORITY: u16 = 1 << 4;
pub const TIMESTAMP_ADDED: u16 = 1 << 5;
pub const UDP_COMMAND: u16 = 1 << 6;
pub const INIT_COMMAND: u16 = 1 << 7;
pub const BROADCAST: u16 = 1 << 15;

/// Returns true if every bit of `flag` is set in the header's state flags.
pub fn has_state(header: &AmsHeader, flag: u16) -> bool {
    header.state_flags & flag == flag
}

/// Returns true if the header marks a response frame.
pub fn is_response(header: &AmsHeader) -> bool {
    has_state(header, RESPONSE)
}

/// ADS states reported by ReadState.
pub mod ads_state {
    pub const INVALID: u16 = 0;
    pub const IDLE: u16 = 1;
    pub const RESET: u16 = 2;
    pub const INIT: u16 = 3;
    pub const START: u16 = 4;
    pub const RUN: u16 = 5;
    pub const STOP: u16 = 6;
    pub const SAVE_CONFIG: u16 = 7;
    pub const LOAD_CONFIG: u16 = 8;
    pub const POWER_FAILURE: u16 = 9;
    pub const POWER_GOOD: u16 = 10;
    pub const ERROR: u16 = 11;
    pub const SHUTDOWN: u16 = 12;
    pub const SUSPEND: u16 = 13;
    pub const RESUME: u16 = 14;
    pub const CONFIG: u16 = 15;
    pub const RECONFIG: u16 = 16;

    /// Returns a human-readable name for an ADS state.
    pub fn name(state: u16) -> &'static str {
        match state {
            INVALID => "Invalid",
            IDLE => "Idle",
            RESET => "Reset",
            INIT => "Init",
            START => "Start",
            RUN => "Run",
            STOP => "Stop",
            SAVE_CONFIG => "SaveConfig",
            LOAD_CONFIG => "LoadConfig",
            POWER_FAILURE => "PowerFailure",
            POWER_GOOD => "PowerGood",
            ERROR => "Error",
            SHUTDOWN => "Shutdown",
            SUSPEND => "Suspend",
            RESUME => "Resume",
            CONFIG => "Config",
            RECONFIG => "Reconfig",
            _ => "Unknown",
        }
    }
}
