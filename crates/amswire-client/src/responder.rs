//! Answers ReadState queries pushed by the remote side.

use std::sync::atomic::{AtomicU16, Ordering};

use amswire_codec::command::error_code;
use amswire_codec::flags::ads_state;
use amswire_codec::{Packet, ReadStateRequest, ReadStateResponse};

/// Locally tracked automation and device state.
///
/// Both values are independent and may be updated by the owning process at
/// any time; the receive loop only reads them.
#[derive(Debug)]
pub struct Responder {
    ads_state: AtomicU16,
    device_state: AtomicU16,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(ads_state::INVALID, ads_state::INVALID)
    }
}

impl Responder {
    pub fn new(ads_state: u16, device_state: u16) -> Self {
        Self {
            ads_state: AtomicU16::new(ads_state),
            device_state: AtomicU16::new(device_state),
        }
    }

    pub fn ads_state(&self) -> u16 {
        self.ads_state.load(Ordering::Acquire)
    }

    pub fn set_ads_state(&self, state: u16) {
        self.ads_state.store(state, Ordering::Release);
    }

    pub fn device_state(&self) -> u16 {
        self.device_state.load(Ordering::Acquire)
    }

    pub fn set_device_state(&self, state: u16) {
        self.device_state.store(state, Ordering::Release);
    }

    /// Set both values at once (lifecycle transitions).
    pub(crate) fn set_all(&self, state: u16) {
        self.set_ads_state(state);
        self.set_device_state(state);
    }

    /// Move both values from `from` to `to`, leaving any value the owner
    /// has already overwritten untouched.
    pub(crate) fn advance(&self, from: u16, to: u16) {
        let _ = self
            .ads_state
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire);
        let _ = self
            .device_state
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Build the reply to `request`: addresses swapped, invoke id echoed,
    /// current state values in the body.
    pub fn respond(&self, request: &ReadStateRequest) -> ReadStateResponse {
        let header = request.header();
        let mut response = ReadStateResponse::new(
            header.sender,
            header.target,
            error_code::NO_ERROR,
            self.ads_state(),
            self.device_state(),
        );
        response.header.invoke_id = header.invoke_id;
        response
    }
}

#[cfg(test)]
mod tests {
    use amswire_codec::flags::{ADS_COMMAND, RESPONSE};
    use amswire_codec::AmsAddr;

    use super::*;

    fn addr(s: &str) -> AmsAddr {
        s.parse().unwrap()
    }

    #[test]
    fn respond_swaps_addresses_and_echoes_invoke_id() {
        let responder = Responder::new(2, 3);
        let mut request = ReadStateRequest::new(addr("1.1.1.1.1.1:30000"), addr("2.2.2.2.2.2:851"));
        request.header.invoke_id = 0xABCD;

        let response = responder.respond(&request);
        assert_eq!(response.header.target, addr("2.2.2.2.2.2:851"));
        assert_eq!(response.header.sender, addr("1.1.1.1.1.1:30000"));
        assert_eq!(response.header.invoke_id, 0xABCD);
        assert_eq!(response.header.state_flags, ADS_COMMAND | RESPONSE);
        assert_eq!(response.result, 0);
        assert_eq!(response.ads_state, 2);
        assert_eq!(response.device_state, 3);
    }

    #[test]
    fn states_are_independent() {
        let responder = Responder::default();
        assert_eq!(responder.ads_state(), ads_state::INVALID);

        responder.set_ads_state(ads_state::RUN);
        assert_eq!(responder.ads_state(), ads_state::RUN);
        assert_eq!(responder.device_state(), ads_state::INVALID);

        responder.set_device_state(7);
        assert_eq!(responder.device_state(), 7);

        responder.set_all(ads_state::STOP);
        assert_eq!(responder.ads_state(), ads_state::STOP);
        assert_eq!(responder.device_state(), ads_state::STOP);
    }

    #[test]
    fn advance_keeps_owner_overrides() {
        let responder = Responder::new(ads_state::START, ads_state::START);
        responder.set_device_state(9);
        responder.advance(ads_state::START, ads_state::RUN);
        assert_eq!(responder.ads_state(), ads_state::RUN);
        assert_eq!(responder.device_state(), 9);
    }
}
