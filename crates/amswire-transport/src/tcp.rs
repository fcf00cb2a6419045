use std::time::Duration;

use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::AmsStream;

/// Well-known AMS/TCP port of the AMS router.
pub const DEFAULT_PORT: u16 = 48898;

/// Append [`DEFAULT_PORT`] to `addr` when it carries no port.
///
/// Bracketed IPv6 literals are respected; a bare IPv6 address without
/// brackets is returned unchanged.
pub fn with_default_port(addr: &str) -> String {
    if addr.starts_with('[') {
        if addr.contains("]:") {
            return addr.to_string();
        }
        return format!("{addr}:{DEFAULT_PORT}");
    }
    match addr.matches(':').count() {
        0 => format!("{addr}:{DEFAULT_PORT}"),
        _ => addr.to_string(),
    }
}

/// Connect to an AMS/TCP endpoint, giving up after `timeout`.
pub async fn connect(addr: &str, timeout: Duration) -> Result<AmsStream> {
    let stream = match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(source)) => {
            return Err(TransportError::Connect {
                addr: addr.to_string(),
                source,
            })
        }
        Err(_) => {
            return Err(TransportError::ConnectTimeout {
                addr: addr.to_string(),
                timeout,
            })
        }
    };
    debug!(%addr, "connected to ams endpoint");
    AmsStream::from_tcp(stream)
}

/// Listening side of an AMS/TCP connection.
///
/// Devices and routers listen; the client never does. This exists for
/// loopback fakes and local tooling.
pub struct AmsListener {
    listener: TcpListener,
}

impl AmsListener {
    /// Bind and listen on `addr`.
    pub async fn bind(addr: impl ToSocketAddrs + std::fmt::Display) -> Result<Self> {
        let label = addr.to_string();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: label.clone(),
                source,
            })?;
        info!(addr = %label, "listening for ams connections");
        Ok(Self { listener })
    }

    /// Accept an incoming connection.
    pub async fn accept(&self) -> Result<AmsStream> {
        let (stream, peer) = self.listener.accept().await.map_err(TransportError::Accept)?;
        debug!(%peer, "accepted connection");
        AmsStream::from_tcp(stream)
    }

    /// The address this listener is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.listener.local_addr().map_err(Into::into)
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "ams-tcp"
    }
}
