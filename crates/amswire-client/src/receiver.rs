//! The receive loop: sole reader of the connection.

use std::sync::Arc;

use amswire_codec::flags::ads_state;
use amswire_codec::{decode_frame, Frame, FrameError, FrameReader, Response};
use tokio::io::AsyncRead;
use tracing::{debug, info, trace, warn};

use crate::client::Shared;
use crate::error::{ClientError, Result};

pub(crate) type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// Run until the stream fails, a frame cannot be decoded, or the client
/// shuts down.
///
/// On exit every pending call is released and the local state becomes STOP.
pub(crate) async fn receive_loop(
    mut reader: FrameReader<BoxedReader>,
    shared: Arc<Shared>,
) -> Result<()> {
    shared.responder.advance(ads_state::START, ads_state::RUN);
    debug!("receive loop started");

    let result = run(&mut reader, &shared).await;

    let released = shared.pending.drain();
    shared.responder.set_all(ads_state::STOP);
    match &result {
        Ok(()) => info!(released, "receive loop stopped"),
        Err(err) => warn!(error = %err, released, "receive loop terminated"),
    }
    result
}

async fn run(reader: &mut FrameReader<BoxedReader>, shared: &Shared) -> Result<()> {
    loop {
        let data = tokio::select! {
            _ = shared.shutdown.cancelled() => return Ok(()),
            frame = reader.read_frame() => frame.map_err(read_error)?,
        };

        match decode_frame(&data)? {
            Frame::Response(response) => deliver(shared, response),
            Frame::ReadStateRequest(request) => {
                let reply = shared.responder.respond(&request);
                debug!(
                    invoke_id = reply.header.invoke_id,
                    ads_state = reply.ads_state,
                    device_state = reply.device_state,
                    "answering read state request"
                );
                shared.write_packet(&reply).await?;
            }
            Frame::Unknown(header) => {
                warn!(
                    cmd_id = header.ams.command_id,
                    state_flags = header.ams.state_flags,
                    invoke_id = header.ams.invoke_id,
                    len = data.len(),
                    "unknown frame"
                );
            }
        }
    }
}

fn deliver(shared: &Shared, response: Response) {
    let invoke_id = response.invoke_id();
    let Some(slot) = shared.pending.take(invoke_id) else {
        debug!(invoke_id, kind = %response.kind(), "dropping response without pending call");
        return;
    };
    trace!(invoke_id, kind = %response.kind(), "resolving pending call");
    if slot.send(response).is_err() {
        debug!(invoke_id, "caller stopped waiting before delivery");
    }
}

fn read_error(err: FrameError) -> ClientError {
    match err {
        FrameError::ConnectionClosed => {
            ClientError::Disconnected("connection closed by peer".to_string())
        }
        other => ClientError::Frame(other),
    }
}
