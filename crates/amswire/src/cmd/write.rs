use crate::cmd::{check_device_status, WriteArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub async fn run(args: WriteArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = args.payload.resolve()?;
    let client = args.conn.connect().await?;
    let response = client
        .write(
            args.conn.target,
            args.conn.sender,
            args.location.group,
            args.location.offset,
            payload,
        )
        .await
        .map_err(|err| client_error("write failed", err))?;
    let _ = client.close().await;

    check_device_status("write failed", &response.header, response.result)?;
    print_report(
        &args.conn.report("write", &response.header, response.result),
        format,
    );
    Ok(SUCCESS)
}
