use crate::cmd::{check_device_status, ReadArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub async fn run(args: ReadArgs, format: OutputFormat) -> CliResult<i32> {
    let client = args.conn.connect().await?;
    let response = client
        .read(
            args.conn.target,
            args.conn.sender,
            args.location.group,
            args.location.offset,
            args.length,
        )
        .await
        .map_err(|err| client_error("read failed", err))?;
    let _ = client.close().await;

    check_device_status("read failed", &response.header, response.result)?;
    let report = args
        .conn
        .report("read", &response.header, response.result)
        .with_data(&response.data);
    print_report(&report, format);
    Ok(SUCCESS)
}
