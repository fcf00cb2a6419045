#![cfg(feature = "cli")]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

use amswire_codec::{
    command, AmsAddr, AmsHeader, Decode, Encode, ReadResponse, ReadStateResponse,
    ReadWriteResponse, AMS_HEADER_LEN, TCP_HEADER_LEN,
};

const TARGET: &str = "5.1.2.3.1.1:851";
const SENDER: &str = "10.0.0.2.1.1:30000";

/// One-shot device: answers a single request on a single connection.
fn spawn_device() -> (String, JoinHandle<AmsHeader>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener
        .local_addr()
        .expect("listener should have an address")
        .to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("client should connect");
        let request = read_request(&mut stream);
        let reply = reply_to(&request);
        stream.write_all(&reply).expect("reply should be written");
        stream.flush().expect("reply should flush");
        // Hold the connection until the client hangs up.
        let mut rest = Vec::new();
        let _ = stream.read_to_end(&mut rest);
        request
    });

    (addr, handle)
}

fn read_request(stream: &mut TcpStream) -> AmsHeader {
    let prefix = (TCP_HEADER_LEN + AMS_HEADER_LEN) as usize;
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while buf.len() < prefix {
        let n = stream.read(&mut chunk).expect("request should be readable");
        assert!(n > 0, "client closed before sending a request");
        buf.extend_from_slice(&chunk[..n]);
    }
    AmsHeader::from_bytes(&buf[TCP_HEADER_LEN as usize..]).expect("request header should decode")
}

fn reply_to(request: &AmsHeader) -> Vec<u8> {
    let (target, sender) = (request.sender, request.target);
    let encoded = match request.command_id {
        command::READ => {
            let mut response = ReadResponse::new(target, sender, 0, vec![0xDE, 0xAD, 0xBE, 0xEF]);
            response.header.invoke_id = request.invoke_id;
            response.to_bytes()
        }
        command::READ_WRITE => {
            let mut response =
                ReadWriteResponse::new(target, sender, 0, 0x1234_5678u32.to_le_bytes().to_vec());
            response.header.invoke_id = request.invoke_id;
            response.to_bytes()
        }
        command::READ_STATE => {
            let mut response = ReadStateResponse::new(target, sender, 0, 5, 0);
            response.header.invoke_id = request.invoke_id;
            response.to_bytes()
        }
        other => panic!("unexpected command id {other}"),
    };
    encoded.expect("reply should encode").to_vec()
}

fn amswire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_amswire"))
        .args(args)
        .env_remove("AMSWIRE_TARGET")
        .env_remove("AMSWIRE_SENDER")
        .output()
        .expect("amswire should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn state_prints_json_report() {
    let (addr, device) = spawn_device();
    let output = amswire(&[
        "--format", "json", "state", addr.as_str(), "--target", TARGET, "--sender", SENDER,
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be json");
    assert_eq!(report["command"], "state");
    assert_eq!(report["ads_state"], 5);
    assert_eq!(report["ads_state_name"], "Run");
    assert_eq!(report["device_state"], 0);

    let request = device.join().expect("device thread should finish");
    assert_eq!(request.command_id, command::READ_STATE);
    assert_eq!(request.target, TARGET.parse::<AmsAddr>().expect("target parses"));
    assert_eq!(request.sender, SENDER.parse::<AmsAddr>().expect("sender parses"));
}

#[test]
fn read_prints_hex_payload() {
    let (addr, device) = spawn_device();
    let output = amswire(&[
        "--format", "json", "read", addr.as_str(), "--target", TARGET, "--sender", SENDER, "--group",
        "0x4020", "--offset", "8", "--length", "4",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be json");
    assert_eq!(report["data"], "deadbeef");
    assert_eq!(report["length"], 4);

    let request = device.join().expect("device thread should finish");
    assert_eq!(request.command_id, command::READ);
}

#[test]
fn handle_resolves_symbol() {
    let (addr, device) = spawn_device();
    let output = amswire(&[
        "--format", "json", "handle", addr.as_str(), "--target", TARGET, "--sender", SENDER,
        "MAIN.counter",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be json");
    assert_eq!(report["handle"], 0x1234_5678);

    let request = device.join().expect("device thread should finish");
    assert_eq!(request.command_id, command::READ_WRITE);
}

#[test]
fn refused_connection_exits_with_transport_code() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        listener
            .local_addr()
            .expect("listener should have an address")
            .to_string()
    };

    let output = amswire(&["state", addr.as_str(), "--target", TARGET, "--sender", SENDER]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("connect failed"));
}

#[test]
fn malformed_group_is_a_usage_error() {
    let output = amswire(&[
        "read", "127.0.0.1", "--target", TARGET, "--sender", SENDER, "--group", "0xZZ",
        "--length", "4",
    ]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn version_prints_package_version() {
    let output = amswire(&["version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));

    let output = amswire(&["version", "--extended"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("default_port: 48898"));
    assert!(text.contains("max_frame_size: 65536"));
}
