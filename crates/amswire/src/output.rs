use std::io::{IsTerminal, Write};

use amswire_codec::flags::ads_state;
use bytes::Bytes;
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One command result as printed to stdout.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub command: &'static str,
    pub target: String,
    pub invoke_id: u32,
    pub error_code: u32,
    pub result: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads_state: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ads_state_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_state: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<u32>,
    #[serde(skip)]
    pub raw: Bytes,
}

impl Report {
    pub fn with_data(mut self, data: &Bytes) -> Self {
        self.length = u32::try_from(data.len()).ok();
        self.data = Some(to_hex(data));
        self.raw = data.clone();
        self
    }

    pub fn with_state(mut self, ads: u16, device: u16) -> Self {
        self.ads_state = Some(ads);
        self.ads_state_name = Some(ads_state::name(ads));
        self.device_state = Some(device);
        self.raw = Bytes::from(format!("{ads} {device}\n"));
        self
    }

    pub fn with_handle(mut self, handle: u32) -> Self {
        self.handle = Some(handle);
        self.raw = Bytes::copy_from_slice(&handle.to_le_bytes());
        self
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("command", self.command.to_string()),
            ("target", self.target.clone()),
            ("invoke_id", self.invoke_id.to_string()),
            ("error_code", format!("{:#x}", self.error_code)),
            ("result", format!("{:#x}", self.result)),
        ];
        if let Some(length) = self.length {
            fields.push(("length", length.to_string()));
        }
        if let Some(data) = &self.data {
            fields.push(("data", data.clone()));
        }
        if let Some(state) = self.ads_state {
            let name = self.ads_state_name.unwrap_or("Unknown");
            fields.push(("ads_state", format!("{state} ({name})")));
        }
        if let Some(state) = self.device_state {
            fields.push(("device_state", state.to_string()));
        }
        if let Some(handle) = self.handle {
            fields.push(("handle", format!("{handle:#010x}")));
        }
        fields
    }
}

pub fn print_report(report: &Report, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (name, value) in report.fields() {
                table.add_row(vec![name.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line = report
                .fields()
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
        OutputFormat::Raw => print_raw(&report.raw),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{b:02x}")).collect()
}

/// Parse a hex string. Whitespace and an optional `0x` prefix are ignored.
pub fn from_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits: String = input.split_whitespace().collect();
    let digits = digits.strip_prefix("0x").unwrap_or(&digits);
    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits in {input:?}"));
    }
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(|| format!("invalid hex byte in {input:?}"))
        })
        .collect()
}
