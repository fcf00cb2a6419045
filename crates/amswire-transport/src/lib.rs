//! AMS/TCP stream transport.
//!
//! The lowest layer of amswire: a single persistent byte stream to an AMS
//! router or device. Everything else builds on the [`AmsStream`] type provided
//! here. The protocol assumes a trusted network; there is no encryption or
//! authentication at this layer.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::AmsStream;
pub use tcp::{connect, with_default_port, AmsListener, DEFAULT_PORT};
