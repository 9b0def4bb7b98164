//! Output format tests.
//!
//! Successful tool calls return a single non-empty text item: a status
//! message naming the output file, or pretty-printed JSON for the tools that
//! report structured data.

use rmcp::model::{CallToolResult, Content, RawContent};
use vfx_mcp_editor::ToolOutput;

/// Validates that a CallToolResult has valid content format.
fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.is_empty() && !result.is_error.unwrap_or(false) {
        return Err("Successful result should have content".to_string());
    }

    for content in &result.content {
        validate_content(content)?;
    }

    Ok(())
}

/// The editor only ever answers with text.
fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.trim().is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        other => Err(format!("Unexpected non-text content: {:?}", other)),
    }
}

/// Wraps a tool output the way the server's `call_tool` does.
fn to_result(output: &ToolOutput) -> CallToolResult {
    CallToolResult::success(vec![Content::text(output.render())])
}

fn text_of(result: &CallToolResult) -> &str {
    match &result.content[0].raw {
        RawContent::Text(text) => &text.text,
        _ => panic!("expected text content"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub_engine::stub_server;
    use serde_json::{Value, json};

    #[test]
    fn test_content_validation() {
        assert!(validate_content(&Content::text("Video trimmed")).is_ok());
        assert!(validate_content(&Content::text("")).is_err());
        assert!(validate_content(&Content::text("  \n")).is_err());
        assert!(validate_content(&Content::image("aGVsbG8=", "image/png")).is_err());
    }

    #[test]
    fn test_empty_results() {
        let empty_success = CallToolResult {
            content: vec![],
            is_error: Some(false),
            meta: None,
            structured_content: None,
        };
        assert!(validate_tool_result(&empty_success).is_err());

        let empty_error = CallToolResult {
            content: vec![],
            is_error: Some(true),
            meta: None,
            structured_content: None,
        };
        assert!(validate_tool_result(&empty_error).is_ok());
    }

    #[tokio::test]
    async fn test_status_message_names_output() {
        let (server, engine) = stub_server();
        let output = server
            .invoke(
                "trim_video",
                json!({ "input_path": "in.mp4", "output_path": "clips/out.mp4", "start_time": 1.5 })
                    .as_object()
                    .cloned(),
            )
            .await
            .unwrap();
        assert_eq!(engine.run_count(), 1);

        let result = to_result(&output);
        assert!(validate_tool_result(&result).is_ok());
        assert!(!result.is_error.unwrap_or(true));
        assert_eq!(text_of(&result), "Video trimmed and saved to clips/out.mp4");
    }

    #[tokio::test]
    async fn test_video_info_is_pretty_json() {
        let (server, engine) = stub_server();
        let output = server
            .invoke("get_video_info", json!({ "video_path": "clip.mp4" }).as_object().cloned())
            .await
            .unwrap();
        assert_eq!(engine.run_count(), 0);
        assert!(matches!(output, ToolOutput::Json(_)));

        let result = to_result(&output);
        assert!(validate_tool_result(&result).is_ok());

        let text = text_of(&result);
        assert!(text.contains('\n'), "JSON should be pretty-printed");
        let info: Value = serde_json::from_str(text).unwrap();
        assert_eq!(info["duration"], json!(5.0));
        assert_eq!(info["video"]["width"], json!(1280));
        assert_eq!(info["video"]["height"], json!(720));
        assert_eq!(info["audio"]["codec"], json!("aac"));
        let fps = info["video"]["fps"].as_f64().unwrap();
        assert!((fps - 29.97).abs() < 0.01, "fps was {}", fps);
    }

    #[tokio::test]
    async fn test_thumbnail_defaults_to_midpoint() {
        let (server, _) = stub_server();
        let output = server
            .invoke(
                "generate_thumbnail",
                json!({ "video_path": "clip.mp4", "output_path": "thumb.jpg" })
                    .as_object()
                    .cloned(),
            )
            .await
            .unwrap();
        assert_eq!(output.render(), "Thumbnail at 2.50s saved to thumb.jpg");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::stub_engine::stub_server;
    use proptest::prelude::*;
    use serde_json::json;

    fn output_path_strategy() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,20}\\.(mp4|mov|mkv)"
    }

    proptest! {
        /// Any successful call yields one valid text item naming its output.
        #[test]
        fn success_names_output(
            output_path in output_path_strategy(),
            speed in 0.25f64..8.0,
        ) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (server, _) = stub_server();
            let output = runtime.block_on(server.invoke(
                "change_speed",
                json!({ "input_path": "in.mp4", "output_path": output_path, "speed": speed })
                    .as_object()
                    .cloned(),
            ));
            prop_assert!(output.is_ok());

            let result = to_result(&output.unwrap());
            prop_assert!(validate_tool_result(&result).is_ok());
            prop_assert!(text_of(&result).ends_with(&output_path));
        }
    }
}
