use std::sync::Arc;
use std::time::Duration;

use amswire_codec::command::{error_code, index_group};
use amswire_codec::flags::ads_state;
use amswire_codec::{
    AmsAddr, FrameReader, FrameWriter, Packet, ReadRequest, ReadResponse, ReadStateRequest,
    ReadStateResponse, ReadWriteRequest, ReadWriteResponse, Request, WriteRequest, WriteResponse,
};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::pending::{CorrelationTable, InvokeIds, PendingGuard};
use crate::receiver::{receive_loop, BoxedReader};
use crate::responder::Responder;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// First invoke id handed out on a fresh connection.
const FIRST_INVOKE_ID: u32 = 1;

/// Length of a symbol handle returned by the device.
const SYMBOL_HANDLE_LEN: usize = 4;

/// State shared between the client handle and its receive loop.
pub(crate) struct Shared {
    pub(crate) pending: CorrelationTable,
    pub(crate) invoke_ids: InvokeIds,
    pub(crate) responder: Responder,
    /// Write-path guard: one frame at a time, from callers and the loop alike.
    writer: Mutex<FrameWriter<BoxedWriter>>,
    pub(crate) shutdown: CancellationToken,
}

impl Shared {
    pub(crate) async fn write_packet<P: Packet>(&self, packet: &P) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_packet(packet).await?;
        Ok(())
    }
}

/// An AMS/ADS client multiplexing concurrent requests over one connection.
///
/// A background receive loop owns the read side of the stream. Any number
/// of tasks may call [`send`](Self::send) (or the typed wrappers)
/// concurrently through a shared reference.
pub struct Client {
    shared: Arc<Shared>,
    config: ClientConfig,
    receiver: Mutex<Option<JoinHandle<Result<()>>>>,
}

impl Client {
    /// Connect to an AMS/TCP endpoint (`host[:port]`, default port 48898).
    pub async fn connect(addr: &str, config: ClientConfig) -> Result<Self> {
        let addr = amswire_transport::with_default_port(addr);
        let stream = amswire_transport::connect(&addr, config.connect_timeout).await?;
        info!(%addr, "ams client connected");
        Ok(Self::from_stream(stream, config))
    }

    /// Wrap an already established stream and start the receive loop.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn from_stream<S>(stream: S, config: ClientConfig) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let reader: BoxedReader = Box::new(read_half);
        let writer: BoxedWriter = Box::new(write_half);

        let shared = Arc::new(Shared {
            pending: CorrelationTable::new(),
            invoke_ids: InvokeIds::starting_at(FIRST_INVOKE_ID),
            responder: Responder::new(ads_state::START, ads_state::START),
            writer: Mutex::new(FrameWriter::with_config(writer, config.frame.clone())),
            shutdown: CancellationToken::new(),
        });

        let reader = FrameReader::with_config(reader, config.frame.clone());
        let handle = tokio::spawn(receive_loop(reader, Arc::clone(&shared)));

        Self {
            shared,
            config,
            receiver: Mutex::new(Some(handle)),
        }
    }

    /// Send `request` and wait for its response.
    ///
    /// The wait ends at the first of: the matching response arriving,
    /// `timeout` elapsing, or `cancel` firing. Whatever the outcome, the
    /// call's entry is gone from the correlation table on return. The
    /// response is returned as received; its header error code and result
    /// field are left to the caller.
    pub async fn send<R: Request>(
        &self,
        mut request: R,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<R::Response> {
        let invoke_id = self.shared.invoke_ids.next_id();
        request.header_mut().invoke_id = invoke_id;

        let slot = self
            .shared
            .pending
            .register(invoke_id)
            .ok_or_else(|| ClientError::Disconnected("receive loop is not running".to_string()))?;
        let _guard = PendingGuard::new(&self.shared.pending, invoke_id);

        debug!(invoke_id, kind = %R::KIND, "sending request");
        self.shared.write_packet(&request).await?;

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = tokio::time::sleep(timeout) => return Err(ClientError::Timeout(timeout)),
            delivered = slot => delivered.map_err(|_| {
                ClientError::Disconnected("receive loop stopped before a response arrived".to_string())
            })?,
        };

        R::Response::try_from(response).map_err(|got| ClientError::UnexpectedResponse {
            expected: <R::Response as Packet>::KIND,
            got: got.kind(),
        })
    }

    /// [`send`](Self::send) with the configured request timeout and no
    /// cancellation.
    pub async fn call<R: Request>(&self, request: R) -> Result<R::Response> {
        let cancel = CancellationToken::new();
        self.send(request, self.config.request_timeout, &cancel).await
    }

    /// Read `length` bytes at `group`/`offset`.
    pub async fn read(
        &self,
        target: AmsAddr,
        sender: AmsAddr,
        group: u32,
        offset: u32,
        length: u32,
    ) -> Result<ReadResponse> {
        self.call(ReadRequest::new(target, sender, group, offset, length))
            .await
    }

    /// Write `data` at `group`/`offset`.
    pub async fn write(
        &self,
        target: AmsAddr,
        sender: AmsAddr,
        group: u32,
        offset: u32,
        data: impl Into<Bytes>,
    ) -> Result<WriteResponse> {
        self.call(WriteRequest::new(target, sender, group, offset, data))
            .await
    }

    /// Write `data` and read back up to `read_length` bytes in one exchange.
    pub async fn read_write(
        &self,
        target: AmsAddr,
        sender: AmsAddr,
        group: u32,
        offset: u32,
        read_length: u32,
        data: impl Into<Bytes>,
    ) -> Result<ReadWriteResponse> {
        self.call(ReadWriteRequest::new(
            target,
            sender,
            group,
            offset,
            read_length,
            data,
        ))
        .await
    }

    /// Query the device's automation and device state.
    pub async fn read_state(&self, target: AmsAddr, sender: AmsAddr) -> Result<ReadStateResponse> {
        self.call(ReadStateRequest::new(target, sender)).await
    }

    /// Resolve a PLC symbol name to its handle.
    pub async fn symbol_handle(&self, target: AmsAddr, sender: AmsAddr, name: &str) -> Result<u32> {
        let response = self
            .read_write(
                target,
                sender,
                index_group::GET_SYM_HANDLE_BY_NAME,
                0,
                SYMBOL_HANDLE_LEN as u32,
                Bytes::copy_from_slice(name.as_bytes()),
            )
            .await?;

        if response.header.error_code != error_code::NO_ERROR {
            return Err(ClientError::Remote {
                code: response.header.error_code,
            });
        }
        let Some(handle) = response.data.get(..SYMBOL_HANDLE_LEN) else {
            return Err(ClientError::ShortData {
                needed: SYMBOL_HANDLE_LEN,
                got: response.data.len(),
            });
        };
        let mut raw = [0u8; SYMBOL_HANDLE_LEN];
        raw.copy_from_slice(handle);
        Ok(u32::from_le_bytes(raw))
    }

    /// Automation state reported to ReadState queries from the device.
    pub fn ads_state(&self) -> u16 {
        self.shared.responder.ads_state()
    }

    pub fn set_ads_state(&self, state: u16) {
        self.shared.responder.set_ads_state(state);
    }

    /// Device state reported to ReadState queries from the device.
    pub fn device_state(&self) -> u16 {
        self.shared.responder.device_state()
    }

    pub fn set_device_state(&self, state: u16) {
        self.shared.responder.set_device_state(state);
    }

    /// Number of requests currently waiting for a response.
    pub fn pending_calls(&self) -> usize {
        self.shared.pending.len()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Wait for the receive loop to finish and return how it ended.
    ///
    /// `Ok(())` means the loop was stopped by [`close`](Self::close); any
    /// error is the failure that terminated the connection. Only the first
    /// caller observes the result.
    pub async fn join(&self) -> Result<()> {
        let handle = self.receiver.lock().await.take();
        match handle {
            Some(handle) => handle
                .await
                .map_err(|err| ClientError::Disconnected(format!("receive loop aborted: {err}")))?,
            None => Err(ClientError::Disconnected(
                "receive loop already joined".to_string(),
            )),
        }
    }

    /// Stop the receive loop, shut down the write side and wait for the loop.
    pub async fn close(&self) -> Result<()> {
        self.shared.shutdown.cancel();
        {
            let mut writer = self.shared.writer.lock().await;
            if let Err(err) = writer.shutdown().await {
                debug!(error = %err, "write shutdown failed");
            }
        }
        self.join().await
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.shared.shutdown.cancel();
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("pending_calls", &self.pending_calls())
            .field("ads_state", &self.ads_state())
            .field("device_state", &self.device_state())
            .field("config", &self.config)
            .finish()
    }
}
