use amswire_client::{CancellationToken, ClientError};
use amswire_codec::ReadStateRequest;
use tracing::info;

use crate::cmd::{parse_duration, WatchArgs};
use crate::exit::{client_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub async fn run(args: WatchArgs, format: OutputFormat) -> CliResult<i32> {
    let interval = parse_duration(&args.interval)?;
    let timeout = parse_duration(&args.conn.timeout)?;
    let stop = CancellationToken::new();
    install_ctrlc_handler(stop.clone())?;

    let client = args.conn.connect().await?;
    let mut ticker = tokio::time::interval(interval);
    let mut polls = 0usize;

    loop {
        if args.count.is_some_and(|count| polls >= count) {
            break;
        }
        tokio::select! {
            _ = stop.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let request = ReadStateRequest::new(args.conn.target, args.conn.sender);
        let response = match client.send(request, timeout, &stop).await {
            Ok(response) => response,
            Err(ClientError::Cancelled) => break,
            Err(err) => return Err(client_error("state query failed", err)),
        };
        polls += 1;

        let report = args
            .conn
            .report("watch", &response.header, response.result)
            .with_state(response.ads_state, response.device_state);
        print_report(&report, format);
    }

    info!(polls, "watch finished");
    let _ = client.close().await;
    Ok(SUCCESS)
}

fn install_ctrlc_handler(stop: CancellationToken) -> CliResult<()> {
    ctrlc::set_handler(move || stop.cancel()).map_err(|err| {
        CliError::new(INTERNAL, format!("signal handler setup failed: {err}"))
    })
}
