//! VFX MCP Editor Server
//!
//! MCP server for video and audio editing using FFmpeg.
//!
//! # Usage
//!
//! ```bash
//! # Run with stdio transport (default)
//! vfx-mcp-editor
//!
//! # Run with HTTP transport
//! vfx-mcp-editor --transport http --port 8080
//!
//! # Serve the videos in a specific directory as resources
//! VFX_MEDIA_DIR=/srv/media vfx-mcp-editor
//! ```

use anyhow::Result;
use clap::Parser;
use vfx_mcp_common::tracing::init_tracing;
use vfx_mcp_common::{Config, McpServerBuilder, TransportArgs};
use vfx_mcp_editor::VfxServer;

#[derive(Parser, Debug)]
#[command(name = "vfx-mcp-editor")]
#[command(about = "MCP server for video and audio editing using FFmpeg")]
#[command(version)]
struct Args {
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so MCP_TRANSPORT, MCP_HOST and MCP_PORT from .env reach clap.
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let config = Config::from_env()?;

    tracing::info!(
        media_dir = %config.media_dir.display(),
        ffmpeg = %config.ffmpeg_bin,
        ffprobe = %config.ffprobe_bin,
        "Starting vfx-mcp-editor server"
    );

    let server = VfxServer::new(config);
    let transport = args.transport.into_transport();

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    Ok(())
}
