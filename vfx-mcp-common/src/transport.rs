//! MCP transport selection.
//!
//! Three transport modes are supported:
//!
//! - **Stdio**: Default mode for local subprocess communication
//! - **HTTP**: Streamable HTTP transport for networked clients
//! - **SSE**: Served by the same streamable HTTP service
//!
//! The mode, host and port come from the command line or from
//! `MCP_TRANSPORT`, `MCP_HOST` and `MCP_PORT`.
//!
//! # Example
//!
//! ```ignore
//! use vfx_mcp_common::transport::TransportArgs;
//! use clap::Parser;
//!
//! #[derive(Parser)]
//! struct Args {
//!     #[command(flatten)]
//!     transport: TransportArgs,
//! }
//!
//! let args = Args::parse();
//! let transport = args.transport.into_transport();
//! ```

use clap::Args;
use std::fmt;

/// Default listen host for network transports.
pub const DEFAULT_HOST: &str = "localhost";

/// Default listen port for network transports.
pub const DEFAULT_PORT: u16 = 8000;

/// Transport mode for MCP server communication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Transport {
    /// Standard input/output transport (default).
    #[default]
    Stdio,
    /// HTTP streamable transport.
    Http {
        /// Host or address to bind
        host: String,
        /// Port to listen on
        port: u16,
    },
    /// Server-Sent Events transport.
    Sse {
        /// Host or address to bind
        host: String,
        /// Port to listen on
        port: u16,
    },
}

impl Transport {
    /// Create a new stdio transport.
    pub fn stdio() -> Self {
        Transport::Stdio
    }

    /// Create a new HTTP transport.
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Transport::Http {
            host: host.into(),
            port,
        }
    }

    /// Create a new SSE transport.
    pub fn sse(host: impl Into<String>, port: u16) -> Self {
        Transport::Sse {
            host: host.into(),
            port,
        }
    }

    pub fn is_stdio(&self) -> bool {
        matches!(self, Transport::Stdio)
    }

    pub fn is_http(&self) -> bool {
        matches!(self, Transport::Http { .. })
    }

    pub fn is_sse(&self) -> bool {
        matches!(self, Transport::Sse { .. })
    }

    /// Get the port if this is a network transport.
    pub fn port(&self) -> Option<u16> {
        match self {
            Transport::Stdio => None,
            Transport::Http { port, .. } | Transport::Sse { port, .. } => Some(*port),
        }
    }

    /// Get the bind address (`host:port`) if this is a network transport.
    pub fn bind_addr(&self) -> Option<String> {
        match self {
            Transport::Stdio => None,
            Transport::Http { host, port } | Transport::Sse { host, port } => {
                Some(format!("{}:{}", host, port))
            }
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http { host, port } => write!(f, "http ({}:{})", host, port),
            Transport::Sse { host, port } => write!(f, "sse ({}:{})", host, port),
        }
    }
}

/// Command-line arguments for transport configuration.
#[derive(Args, Debug, Clone)]
pub struct TransportArgs {
    /// Transport mode: stdio, http, or sse
    #[arg(
        long,
        env = "MCP_TRANSPORT",
        default_value = "stdio",
        value_parser = parse_transport_mode
    )]
    pub transport: TransportMode,

    /// Host for HTTP/SSE transport
    #[arg(long, env = "MCP_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port for HTTP/SSE transport
    #[arg(long, env = "MCP_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

/// Transport mode parsed from command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    #[default]
    Stdio,
    Http,
    Sse,
}

/// Parse a transport mode name, case-insensitively.
pub fn parse_transport_mode(s: &str) -> Result<TransportMode, String> {
    match s.trim().to_lowercase().as_str() {
        "stdio" => Ok(TransportMode::Stdio),
        "http" => Ok(TransportMode::Http),
        "sse" => Ok(TransportMode::Sse),
        _ => Err(format!(
            "Invalid transport mode '{}'. Valid options: stdio, http, sse",
            s
        )),
    }
}

impl TransportArgs {
    /// Convert command-line arguments into a Transport configuration.
    pub fn into_transport(self) -> Transport {
        match self.transport {
            TransportMode::Stdio => Transport::Stdio,
            TransportMode::Http => Transport::Http {
                host: self.host,
                port: self.port,
            },
            TransportMode::Sse => Transport::Sse {
                host: self.host,
                port: self.port,
            },
        }
    }
}

impl Default for TransportArgs {
    fn default() -> Self {
        Self {
            transport: TransportMode::Stdio,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
