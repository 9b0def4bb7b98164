//! MCP Server implementation for the editor.
//!
//! Tools are dispatched through the [`ToolRegistry`]; progress and failures
//! are mirrored to the client as MCP logging notifications.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, ListResourcesResult, LoggingLevel,
        LoggingMessageNotificationParam, RawResource, ReadResourceResult, Resource,
        ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};
use serde_json::json;
use tracing::{debug, error, info, warn};
use vfx_mcp_common::config::Config;
use vfx_mcp_common::error::Error;

use crate::handler::EditorHandler;
use crate::registry::{ToolOutput, ToolRegistry};
use crate::resources::{self, LIST_URI, VideoResource};

/// Logger name attached to client notifications.
pub const LOGGER_NAME: &str = "vfx-mcp-editor";

/// MCP server for video editing.
#[derive(Clone)]
pub struct VfxServer {
    handler: Arc<EditorHandler>,
    registry: Arc<ToolRegistry>,
}

impl VfxServer {
    /// Create a server that runs the ffmpeg binaries named in `config`.
    pub fn new(config: Config) -> Self {
        Self::with_handler(EditorHandler::new(config))
    }

    pub fn with_handler(handler: EditorHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            registry: Arc::new(ToolRegistry::standard()),
        }
    }

    pub fn handler(&self) -> &EditorHandler {
        &self.handler
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run a tool by name, outside of any MCP session.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<ToolOutput, McpError> {
        let entry = self
            .registry
            .get(name)
            .ok_or_else(|| McpError::invalid_params(format!("Unknown tool: {}", name), None))?;
        (entry.invoke)(self.handler.as_ref(), arguments)
            .await
            .map_err(|e| to_mcp_error(entry.name, e))
    }
}

/// Map an editor error onto an MCP error. Validation failures are the
/// caller's fault; everything else is internal.
pub fn to_mcp_error(tool: &str, err: Error) -> McpError {
    match err {
        Error::Validation(message) => McpError::invalid_params(message, None),
        other => McpError::internal_error(format!("{} failed: {}", tool, other), None),
    }
}

async fn notify(context: &RequestContext<RoleServer>, level: LoggingLevel, message: String) {
    let result = context
        .peer
        .notify_logging_message(LoggingMessageNotificationParam {
            level,
            logger: Some(LOGGER_NAME.to_string()),
            data: json!(message),
        })
        .await;
    if let Err(e) = result {
        debug!(error = %e, "Failed to send log notification");
    }
}

fn json_resource(uri: String, name: String, description: String) -> Resource {
    Resource {
        raw: RawResource {
            uri,
            name,
            title: None,
            description: Some(description),
            mime_type: Some("application/json".to_string()),
            size: None,
            icons: None,
            meta: None,
        },
        annotations: None,
    }
}

impl ServerHandler for VfxServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Video and audio editing server using FFmpeg. \
                 Provides tools for trimming, joining, filtering, compositing and analysing media, \
                 and resources listing the videos in the media directory."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_logging()
                .enable_resources()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<rmcp::model::ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(rmcp::model::ListToolsResult {
                tools: self.registry.tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            let entry = self.registry.get(params.name.as_ref()).ok_or_else(|| {
                McpError::invalid_params(format!("Unknown tool: {}", params.name), None)
            })?;

            info!(tool = entry.name, "Calling tool");
            notify(&context, LoggingLevel::Info, format!("Running {}", entry.name)).await;

            match (entry.invoke)(self.handler.as_ref(), params.arguments).await {
                Ok(output) => Ok(CallToolResult::success(vec![Content::text(output.render())])),
                Err(e) => {
                    if e.is_validation() {
                        warn!(tool = entry.name, error = %e, "Rejected tool call");
                    } else {
                        error!(tool = entry.name, error = %e, "Tool failed");
                    }
                    notify(&context, LoggingLevel::Error, format!("{} failed: {}", entry.name, e)).await;
                    Err(to_mcp_error(entry.name, e))
                }
            }
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            let mut listed = vec![json_resource(
                LIST_URI.to_string(),
                "Video Files".to_string(),
                "Video files available in the media directory".to_string(),
            )];

            let media_dir = &self.handler.config().media_dir;
            match resources::list_videos(media_dir).await {
                Ok(names) => {
                    listed.extend(names.into_iter().map(|name| {
                        json_resource(
                            resources::metadata_uri(&name),
                            format!("{} metadata", name),
                            format!("Duration, format and stream details of {}", name),
                        )
                    }));
                }
                Err(e) => {
                    warn!(dir = %media_dir.display(), error = %e, "Failed to scan media directory");
                }
            }

            Ok(ListResourcesResult {
                resources: listed,
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = match VideoResource::parse(uri) {
                Some(VideoResource::List) => {
                    resources::list_resource_json(&self.handler.config().media_dir)
                        .await
                        .map_err(|e| {
                            McpError::internal_error(format!("Failed to list videos: {}", e), None)
                        })?
                }
                Some(VideoResource::Metadata(name)) => {
                    resources::metadata_resource_json(&self.handler, &name).await
                }
                None => {
                    return Err(McpError::resource_not_found(
                        format!("Unknown resource: {}", uri),
                        None,
                    ));
                }
            };

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{RecordingEngine, probe_json};
    use serde_json::Value;

    fn test_server(engine: RecordingEngine) -> VfxServer {
        VfxServer::with_handler(EditorHandler::with_engine(Config::default(), Arc::new(engine)))
    }

    fn args(value: Value) -> Option<serde_json::Map<String, Value>> {
        value.as_object().cloned()
    }

    #[test]
    fn test_server_info() {
        let server = VfxServer::new(Config::default());
        let info = server.get_info();
        assert!(info.instructions.unwrap().contains("FFmpeg"));
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.logging.is_some());
    }

    #[test]
    fn test_error_mapping() {
        let err = to_mcp_error("trim_video", Error::validation("start_time: must be >= 0"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(err.message, "start_time: must be >= 0");

        let err = to_mcp_error("trim_video", Error::ffmpeg("ffmpeg failed: No such file"));
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("trim_video failed"));
        assert!(err.message.contains("No such file"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let server = test_server(RecordingEngine::default());
        let err = server.invoke("explode_video", None).await.unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert!(err.message.contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_invoke_validation_is_invalid_params() {
        let server = test_server(RecordingEngine::default());
        let err = server
            .invoke(
                "resize_video",
                args(serde_json::json!({
                    "input_path": "a.mp4", "output_path": "b.mp4", "scale": 0.5, "width": 640
                })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_invoke_engine_failure_is_internal() {
        let server = test_server(RecordingEngine::failing("moov atom not found"));
        let err = server
            .invoke(
                "trim_video",
                args(serde_json::json!({
                    "input_path": "a.mp4", "output_path": "b.mp4", "start_time": 1.0
                })),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("moov atom not found"));
    }

    #[tokio::test]
    async fn test_invoke_scene_report_is_json() {
        let server = test_server(RecordingEngine::with_probe(probe_json(4.0, 320, 240, false)));
        let output = server
            .invoke("detect_scene_changes", args(serde_json::json!({"input_path": "a.mp4"})))
            .await
            .unwrap();
        let body: Value = serde_json::from_str(&output.render()).unwrap();
        assert_eq!(body["scene_count"], 1);
        assert_eq!(body["total_duration"], 4.0);
    }
}
