use std::time::Duration;

use amswire_codec::{FrameConfig, Framing};

/// Default deadline for a single request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for establishing the TCP connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline used by the convenience wrappers (`read`, `write`, ...).
    pub request_timeout: Duration,
    /// Deadline for [`Client::connect`](crate::Client::connect).
    pub connect_timeout: Duration,
    /// Frame reader/writer settings.
    pub frame: FrameConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            frame: FrameConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.frame.max_frame_size = max_frame_size;
        self
    }

    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.frame.framing = framing;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame.write_timeout = timeout;
        self
    }
}
