//! Unit tests for transport configuration.

use clap::Parser;
use proptest::prelude::*;

use super::transport::{
    DEFAULT_HOST, DEFAULT_PORT, Transport, TransportArgs, TransportMode, parse_transport_mode,
};

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    transport: TransportArgs,
}

#[test]
fn test_transport_default_is_stdio() {
    let transport = Transport::default();
    assert!(transport.is_stdio());
    assert!(!transport.is_http());
    assert!(!transport.is_sse());
    assert_eq!(transport.port(), None);
    assert_eq!(transport.bind_addr(), None);
}

#[test]
fn test_transport_http_constructor() {
    let transport = Transport::http("0.0.0.0", 3000);
    assert!(transport.is_http());
    assert_eq!(transport.port(), Some(3000));
    assert_eq!(transport.bind_addr().as_deref(), Some("0.0.0.0:3000"));
    assert_eq!(transport.to_string(), "http (0.0.0.0:3000)");
}

#[test]
fn test_transport_sse_constructor() {
    let transport = Transport::sse("localhost", 8000);
    assert!(transport.is_sse());
    assert!(!transport.is_http());
    assert_eq!(transport.port(), Some(8000));
    assert_eq!(transport.to_string(), "sse (localhost:8000)");
}

#[test]
fn test_transport_args_default() {
    let args = TransportArgs::default();
    assert_eq!(args.transport, TransportMode::Stdio);
    assert_eq!(args.host, DEFAULT_HOST);
    assert_eq!(args.port, DEFAULT_PORT);
    assert!(args.into_transport().is_stdio());
}

#[test]
fn test_transport_args_into_transport_http() {
    let args = TransportArgs {
        transport: TransportMode::Http,
        host: "127.0.0.1".to_string(),
        port: 9000,
    };
    assert_eq!(args.into_transport(), Transport::http("127.0.0.1", 9000));
}

#[test]
fn test_transport_args_into_transport_sse() {
    let args = TransportArgs {
        transport: TransportMode::Sse,
        host: "localhost".to_string(),
        port: 4000,
    };
    assert_eq!(args.into_transport(), Transport::sse("localhost", 4000));
}

#[test]
fn test_parse_transport_mode_is_case_insensitive() {
    assert_eq!(parse_transport_mode("STDIO"), Ok(TransportMode::Stdio));
    assert_eq!(parse_transport_mode("Http"), Ok(TransportMode::Http));
    assert_eq!(parse_transport_mode(" sse "), Ok(TransportMode::Sse));
}

#[test]
fn test_parse_transport_mode_rejects_unknown() {
    let err = parse_transport_mode("websocket").unwrap_err();
    assert!(err.contains("websocket"));
    assert!(err.contains("stdio, http, sse"));
}

#[test]
fn test_cli_flags() {
    let cli = TestCli::try_parse_from([
        "vfx-mcp",
        "--transport",
        "http",
        "--host",
        "0.0.0.0",
        "--port",
        "9100",
    ])
    .unwrap();

    assert_eq!(cli.transport.into_transport(), Transport::http("0.0.0.0", 9100));
}

#[test]
fn test_cli_rejects_bad_transport() {
    let result = TestCli::try_parse_from(["vfx-mcp", "--transport", "carrier-pigeon"]);
    assert!(result.is_err());
}

#[test]
fn test_transport_equality() {
    assert_eq!(Transport::Stdio, Transport::Stdio);
    assert_ne!(Transport::http("localhost", 8000), Transport::sse("localhost", 8000));
    assert_ne!(Transport::http("localhost", 8000), Transport::http("localhost", 8001));
    assert_ne!(Transport::http("localhost", 8000), Transport::http("0.0.0.0", 8000));
}

proptest! {
    #[test]
    fn network_transports_keep_port(port in 1u16..=u16::MAX) {
        let http = Transport::http("localhost", port);
        prop_assert_eq!(http.port(), Some(port));
        let expected = format!("localhost:{}", port);
        prop_assert_eq!(http.bind_addr(), Some(expected));
    }
}
