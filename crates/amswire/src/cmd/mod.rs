use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use amswire_client::{Client, ClientConfig};
use amswire_codec::{AmsAddr, AmsHeader, Framing};
use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{client_error, CliError, CliResult, INTERNAL, USAGE};
use crate::output::{from_hex, Report};

pub mod handle;
pub mod read;
pub mod read_write;
pub mod state;
pub mod version;
pub mod watch;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read bytes from an index group/offset.
    Read(ReadArgs),
    /// Write bytes to an index group/offset.
    Write(WriteArgs),
    /// Write bytes and read the reply in one exchange.
    ReadWrite(ReadWriteArgs),
    /// Query the device's ADS and device state.
    State(StateArgs),
    /// Resolve a PLC symbol name to its handle.
    Handle(HandleArgs),
    /// Poll the device state until interrupted.
    Watch(WatchArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: crate::output::OutputFormat) -> CliResult<i32> {
    match command {
        Command::Read(args) => block_on(read::run(args, format))?,
        Command::Write(args) => block_on(write::run(args, format))?,
        Command::ReadWrite(args) => block_on(read_write::run(args, format))?,
        Command::State(args) => block_on(state::run(args, format))?,
        Command::Handle(args) => block_on(handle::run(args, format))?,
        Command::Watch(args) => block_on(watch::run(args, format))?,
        Command::Version(args) => version::run(args),
    }
}

fn block_on<F: Future>(future: F) -> CliResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| CliError::new(INTERNAL, format!("failed to start runtime: {err}")))?;
    Ok(runtime.block_on(future))
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FramingArg {
    /// One read is one frame.
    Single,
    /// Reassemble frames from the envelope length.
    Prefixed,
}

/// Connection options shared by every network command.
#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// AMS/TCP endpoint (`host[:port]`, default port 48898).
    pub addr: String,
    /// Target AMS address (`a.b.c.d.e.f:port`).
    #[arg(long, env = "AMSWIRE_TARGET")]
    pub target: AmsAddr,
    /// Sender AMS address (`a.b.c.d.e.f:port`).
    #[arg(long, env = "AMSWIRE_SENDER")]
    pub sender: AmsAddr,
    /// Connect and request timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
    /// How inbound bytes are split into frames.
    #[arg(long, value_enum, default_value = "single")]
    pub framing: FramingArg,
}

impl ConnectArgs {
    pub async fn connect(&self) -> CliResult<Client> {
        let timeout = parse_duration(&self.timeout)?;
        let framing = match self.framing {
            FramingArg::Single => Framing::SingleRead,
            FramingArg::Prefixed => Framing::LengthPrefixed,
        };
        let config = ClientConfig::default()
            .with_connect_timeout(timeout)
            .with_request_timeout(timeout)
            .with_framing(framing);
        Client::connect(&self.addr, config)
            .await
            .map_err(|err| client_error("connect failed", err))
    }

    /// Report skeleton for a response header.
    pub fn report(&self, command: &'static str, header: &AmsHeader, result: u32) -> Report {
        Report {
            command,
            target: self.target.to_string(),
            invoke_id: header.invoke_id,
            error_code: header.error_code,
            result,
            ..Report::default()
        }
    }
}

/// Index group/offset pair.
#[derive(Args, Debug)]
pub struct Location {
    /// Index group (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_u32)]
    pub group: u32,
    /// Index offset (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_u32, default_value = "0")]
    pub offset: u32,
}

/// Payload source for write commands.
#[derive(Args, Debug)]
pub struct PayloadArgs {
    /// Hex-encoded payload.
    #[arg(long, conflicts_with_all = ["data", "file"])]
    pub hex: Option<String>,
    /// Raw string payload.
    #[arg(long, conflicts_with_all = ["hex", "file"])]
    pub data: Option<String>,
    /// Read payload from file.
    #[arg(long, conflicts_with_all = ["hex", "data"])]
    pub file: Option<PathBuf>,
}

impl PayloadArgs {
    pub fn resolve(&self) -> CliResult<Vec<u8>> {
        if let Some(hex) = &self.hex {
            return from_hex(hex).map_err(|err| CliError::new(USAGE, format!("--hex: {err}")));
        }
        if let Some(data) = &self.data {
            return Ok(data.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return std::fs::read(path).map_err(|err| {
                crate::exit::io_error(&format!("failed reading {}", path.display()), err)
            });
        }
        Ok(Vec::new())
    }
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,
    #[command(flatten)]
    pub location: Location,
    /// Number of bytes to read.
    #[arg(long, value_parser = parse_u32)]
    pub length: u32,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,
    #[command(flatten)]
    pub location: Location,
    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Args, Debug)]
pub struct ReadWriteArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,
    #[command(flatten)]
    pub location: Location,
    /// Number of bytes expected back.
    #[arg(long, value_parser = parse_u32)]
    pub read_length: u32,
    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Args, Debug)]
pub struct StateArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,
}

#[derive(Args, Debug)]
pub struct HandleArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,
    /// Symbol name, e.g. `MAIN.counter`.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub conn: ConnectArgs,
    /// Poll interval (e.g. 1s, 250ms).
    #[arg(long, default_value = "1s")]
    pub interval: String,
    /// Exit after N polls.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Fail with the device's error when the header or result field is non-zero.
pub fn check_device_status(context: &str, header: &AmsHeader, result: u32) -> CliResult<()> {
    let code = if header.error_code != 0 {
        header.error_code
    } else {
        result
    };
    if code == 0 {
        return Ok(());
    }
    Err(client_error(
        context,
        amswire_client::ClientError::Remote { code },
    ))
}

pub fn parse_u32(input: &str) -> Result<u32, String> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|err| format!("invalid number {input:?}: {err}"))
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn parse_u32_accepts_hex_and_decimal() {
        assert_eq!(parse_u32("0x4020").unwrap(), 0x4020);
        assert_eq!(parse_u32("0XF003").unwrap(), 0xF003);
        assert_eq!(parse_u32("851").unwrap(), 851);
        assert!(parse_u32("0xZZ").is_err());
        assert!(parse_u32("-1").is_err());
    }

    #[test]
    fn device_status_prefers_header_error() {
        let mut header = AmsHeader::default();
        assert!(check_device_status("read", &header, 0).is_ok());

        header.error_code = 0x706;
        let err = check_device_status("read", &header, 0x1).unwrap_err();
        assert!(err.message.contains("0x706"));

        header.error_code = 0;
        let err = check_device_status("read", &header, 0x701).unwrap_err();
        assert!(err.message.contains("0x701"));
    }
}
