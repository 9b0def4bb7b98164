//! Server startup integration tests.
//!
//! Tests that the editor server can be instantiated and advertises its tools
//! and resources.

use vfx_mcp_common::Config;

/// Test configuration for integration tests.
fn test_config() -> Config {
    Config::default()
}

/// Every tool the editor is expected to serve.
pub const EXPECTED_TOOLS: &[&str] = &[
    "trim_video",
    "get_video_info",
    "resize_video",
    "concatenate_videos",
    "extract_audio",
    "add_audio",
    "apply_filter",
    "change_speed",
    "generate_thumbnail",
    "convert_format",
    "create_video_slideshow",
    "extract_frames",
    "add_text_overlay",
    "create_video_mosaic",
    "create_picture_in_picture",
    "apply_color_grading",
    "create_time_lapse",
    "merge_audio_tracks",
    "create_green_screen_effect",
    "create_video_transitions",
    "create_split_screen",
    "apply_video_stabilization",
    "detect_scene_changes",
    "create_zoom_pan_effect",
    "create_loop_video",
    "apply_motion_blur",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::ServerHandler;
    use vfx_mcp_common::{McpServerBuilder, Transport, shutdown_channel};
    use vfx_mcp_editor::VfxServer;

    #[test]
    fn test_editor_server_startup() {
        let server = VfxServer::new(test_config());
        let info = server.get_info();

        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(
            instructions.contains("video"),
            "Server instructions should mention 'video'"
        );
    }

    #[test]
    fn test_editor_server_capabilities() {
        let info = VfxServer::new(test_config()).get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.logging.is_some());
    }

    #[test]
    fn test_registry_matches_expected_tools() {
        let server = VfxServer::new(test_config());
        let names: Vec<&str> = server.registry().names().collect();
        assert_eq!(names, EXPECTED_TOOLS);
    }

    #[test]
    fn test_servers_share_registry_on_clone() {
        let server = VfxServer::new(test_config());
        let clone = server.clone();
        assert!(std::ptr::eq(server.registry(), clone.registry()));
    }

    /// The HTTP transport binds, serves and stops on the shutdown signal.
    #[tokio::test]
    async fn test_http_server_shuts_down() {
        let (tx, rx) = shutdown_channel();
        let builder = McpServerBuilder::new(VfxServer::new(test_config()))
            .with_transport(Transport::http("127.0.0.1", 0))
            .with_shutdown(rx);

        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            let _ = tx.send(());
        });

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), builder.run())
            .await
            .expect("server should stop after shutdown signal");
        assert!(result.is_ok(), "server returned {:?}", result.err());
    }
}
