//! Asynchronous AMS/ADS client.
//!
//! One [`Client`] owns one connection. A background receive loop reads
//! every inbound frame and either resolves the pending call with the same
//! invoke id, answers a ReadState query pushed by the device, or logs and
//! skips the frame. Requests can be issued concurrently from any number of
//! tasks.

pub mod client;
pub mod config;
pub mod error;
pub mod pending;
mod receiver;
pub mod responder;

pub use client::Client;
pub use config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ClientError, Result};
pub use pending::{CorrelationTable, InvokeIds};
pub use responder::Responder;
pub use tokio_util::sync::CancellationToken;
