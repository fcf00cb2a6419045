use crate::cmd::HandleArgs;
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::{print_report, OutputFormat, Report};

pub async fn run(args: HandleArgs, format: OutputFormat) -> CliResult<i32> {
    let client = args.conn.connect().await?;
    let handle = client
        .symbol_handle(args.conn.target, args.conn.sender, &args.name)
        .await
        .map_err(|err| client_error(&format!("handle lookup for {} failed", args.name), err))?;
    let _ = client.close().await;

    let report = Report {
        command: "handle",
        target: args.conn.target.to_string(),
        ..Report::default()
    }
    .with_handle(handle);
    print_report(&report, format);
    Ok(SUCCESS)
}
