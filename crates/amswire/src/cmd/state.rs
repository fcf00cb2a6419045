use crate::cmd::{check_device_status, StateArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub async fn run(args: StateArgs, format: OutputFormat) -> CliResult<i32> {
    let client = args.conn.connect().await?;
    let response = client
        .read_state(args.conn.target, args.conn.sender)
        .await
        .map_err(|err| client_error("state query failed", err))?;
    let _ = client.close().await;

    check_device_status("state query failed", &response.header, response.result)?;
    let report = args
        .conn
        .report("state", &response.header, response.result)
        .with_state(response.ads_state, response.device_state);
    print_report(&report, format);
    Ok(SUCCESS)
}
