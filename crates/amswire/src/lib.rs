//! Asynchronous client for the AMS/ADS automation protocol.
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP connection plumbing
//! - [`codec`]: sticky-error buffer, headers, packets, framing
//! - [`client`]: request correlation, receive loop, ReadState responder
//!
//! ```no_run
//! # async fn demo() -> amswire::client::Result<()> {
//! use amswire::client::{Client, ClientConfig};
//!
//! let client = Client::connect("192.168.0.10", ClientConfig::default()).await?;
//! let target = "5.10.20.30.1.1:851".parse().expect("valid address");
//! let sender = "192.168.0.2.1.1:30000".parse().expect("valid address");
//! let handle = client.symbol_handle(target, sender, "MAIN.counter").await?;
//! println!("handle {handle:#x}");
//! client.close().await
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use amswire_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use amswire_codec::*;
}

/// Re-export client types.
pub mod client {
    pub use amswire_client::*;
}

pub use amswire_client::{Client, ClientConfig, ClientError};
pub use amswire_codec::{AmsAddr, NetId};
