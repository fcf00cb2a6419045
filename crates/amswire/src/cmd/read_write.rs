use crate::cmd::{check_device_status, ReadWriteArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat};

pub async fn run(args: ReadWriteArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = args.payload.resolve()?;
    let client = args.conn.connect().await?;
    let response = client
        .read_write(
            args.conn.target,
            args.conn.sender,
            args.location.group,
            args.location.offset,
            args.read_length,
            payload,
        )
        .await
        .map_err(|err| client_error("read-write failed", err))?;
    let _ = client.close().await;

    check_device_status("read-write failed", &response.header, response.result)?;
    let report = args
        .conn
        .report("read-write", &response.header, response.result)
        .with_data(&response.data);
    print_report(&report, format);
    Ok(SUCCESS)
}
