//! Tool registry.
//!
//! The registry is an explicit table built once at startup. Each entry pairs
//! the advertised MCP tool (name, description, input schema) with a function
//! pointer that decodes the arguments and calls the matching
//! [`EditorHandler`] method.

use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use vfx_mcp_common::error::{Error, Result};

use crate::handler::EditorHandler;
use crate::params::*;
use crate::probe::VideoMetadata;
use crate::scenes::SceneReport;

/// What a tool hands back to the client.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A human-readable status message.
    Text(String),
    /// A structured result, sent as pretty-printed JSON text.
    Json(Value),
}

impl ToolOutput {
    /// The text sent as the tool's content.
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Conversion of a handler result into [`ToolOutput`].
pub trait IntoToolOutput {
    fn into_output(self) -> Result<ToolOutput>;
}

impl IntoToolOutput for String {
    fn into_output(self) -> Result<ToolOutput> {
        Ok(ToolOutput::Text(self))
    }
}

fn json_output<T: serde::Serialize>(value: &T) -> Result<ToolOutput> {
    serde_json::to_value(value)
        .map(ToolOutput::Json)
        .map_err(|e| Error::Io(e.into()))
}

impl IntoToolOutput for VideoMetadata {
    fn into_output(self) -> Result<ToolOutput> {
        json_output(&self)
    }
}

impl IntoToolOutput for SceneReport {
    fn into_output(self) -> Result<ToolOutput> {
        json_output(&self)
    }
}

pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<ToolOutput>> + Send + 'a>>;

/// Decodes arguments and runs one tool.
pub type InvokeFn = for<'a> fn(&'a EditorHandler, Option<Map<String, Value>>) -> ToolFuture<'a>;

/// One registered tool.
pub struct ToolEntry {
    pub name: &'static str,
    pub description: &'static str,
    /// The definition advertised by `tools/list`.
    pub tool: rmcp::model::Tool,
    pub invoke: InvokeFn,
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry").field("name", &self.name).finish()
    }
}

/// Build a [`ToolEntry`] whose invoke function parses `$params` and awaits
/// `EditorHandler::$method`.
macro_rules! tool {
    ($name:literal, $params:ty, $method:ident, $description:literal) => {{
        fn invoke<'a>(
            handler: &'a EditorHandler,
            args: Option<Map<String, Value>>,
        ) -> ToolFuture<'a> {
            Box::pin(async move {
                let params: $params = parse_args(args)?;
                handler.$method(params).await?.into_output()
            })
        }
        ToolEntry {
            name: $name,
            description: $description,
            tool: create_tool::<$params>($name, $description),
            invoke,
        }
    }};
}

/// The table of tools served by the editor.
#[derive(Debug)]
pub struct ToolRegistry {
    entries: Vec<ToolEntry>,
}

impl ToolRegistry {
    /// Every editing tool, basic operations first.
    pub fn standard() -> Self {
        let entries = vec![
            // =================================================================
            // Basic operations
            // =================================================================
            tool!(
                "trim_video",
                TrimVideoParams,
                trim_video,
                "Cut a segment from a video without re-encoding, starting at start_time for an optional duration."
            ),
            tool!(
                "get_video_info",
                GetVideoInfoParams,
                get_video_info,
                "Get metadata for a media file: container, duration, size, bit rate and the first video and audio streams."
            ),
            tool!(
                "resize_video",
                ResizeVideoParams,
                resize_video,
                "Resize a video by width, height, both, or a scale factor. A missing dimension keeps the aspect ratio."
            ),
            tool!(
                "concatenate_videos",
                ConcatenateVideosParams,
                concatenate_videos,
                "Join two or more videos end to end without re-encoding. Inputs should share codecs and resolution."
            ),
            tool!(
                "extract_audio",
                ExtractAudioParams,
                extract_audio,
                "Extract the audio track of a video to mp3, wav, aac, flac or ogg."
            ),
            tool!(
                "add_audio",
                AddAudioParams,
                add_audio,
                "Add an audio track to a video, replacing the existing audio or mixing with it."
            ),
            tool!(
                "apply_filter",
                ApplyFilterParams,
                apply_filter,
                "Apply a named visual filter (blur, sharpen, brightness, contrast, saturation, vintage, sepia, grayscale, hflip, vflip)."
            ),
            tool!(
                "change_speed",
                ChangeSpeedParams,
                change_speed,
                "Speed a video up or slow it down, adjusting audio tempo to match."
            ),
            tool!(
                "generate_thumbnail",
                GenerateThumbnailParams,
                generate_thumbnail,
                "Save a single frame as an image. Defaults to the middle of the video."
            ),
            tool!(
                "convert_format",
                ConvertFormatParams,
                convert_format,
                "Transcode a media file, optionally setting container format, codecs and bitrates."
            ),
            // =================================================================
            // Advanced operations
            // =================================================================
            tool!(
                "create_video_slideshow",
                CreateSlideshowParams,
                create_video_slideshow,
                "Build a video from still images, each shown for a fixed time, with optional crossfades."
            ),
            tool!(
                "extract_frames",
                ExtractFramesParams,
                extract_frames,
                "Save frames from a time range as numbered images in a directory."
            ),
            tool!(
                "add_text_overlay",
                AddTextOverlayParams,
                add_text_overlay,
                "Burn text into a video at a named or custom position, optionally for a limited time."
            ),
            tool!(
                "create_video_mosaic",
                CreateMosaicParams,
                create_video_mosaic,
                "Arrange videos in a grid (e.g. 2x2) on a 1920x1080 canvas."
            ),
            tool!(
                "create_picture_in_picture",
                PictureInPictureParams,
                create_picture_in_picture,
                "Overlay a scaled video on top of a main video at a corner, the centre or a custom position."
            ),
            tool!(
                "apply_color_grading",
                ColorGradingParams,
                apply_color_grading,
                "Adjust brightness, contrast, saturation, gamma, colour temperature and tint."
            ),
            tool!(
                "create_time_lapse",
                TimeLapseParams,
                create_time_lapse,
                "Turn a video into a time-lapse by keeping every Nth frame, with optional stabilization and motion smoothing."
            ),
            tool!(
                "merge_audio_tracks",
                MergeAudioParams,
                merge_audio_tracks,
                "Combine audio files by mixing, playing in sequence, or overlaying onto the first track."
            ),
            tool!(
                "create_green_screen_effect",
                GreenScreenParams,
                create_green_screen_effect,
                "Key out a background colour and optionally composite over a background video or image."
            ),
            tool!(
                "create_video_transitions",
                TransitionsParams,
                create_video_transitions,
                "Join videos with fade, dissolve, wipe, slide, pixelize or radial transitions."
            ),
            tool!(
                "create_split_screen",
                SplitScreenParams,
                create_split_screen,
                "Show two to four videos side by side, stacked, in a quad layout with borders, or split along a diagonal."
            ),
            tool!(
                "apply_video_stabilization",
                StabilizationParams,
                apply_video_stabilization,
                "Stabilize shaky footage with a two-pass motion analysis and transform."
            ),
            tool!(
                "detect_scene_changes",
                DetectScenesParams,
                detect_scene_changes,
                "Find scene cuts and report each scene's start, end and duration."
            ),
            // =================================================================
            // Motion effects
            // =================================================================
            tool!(
                "create_zoom_pan_effect",
                ZoomPanParams,
                create_zoom_pan_effect,
                "Ken Burns style zoom and pan over an image or video, with start and end zoom, centre points and easing."
            ),
            tool!(
                "create_loop_video",
                LoopVideoParams,
                create_loop_video,
                "Repeat a video to a target length, crossfading the end into the start for a seamless loop."
            ),
            tool!(
                "apply_motion_blur",
                MotionBlurParams,
                apply_motion_blur,
                "Simulate motion blur along an angle, blending neighbouring frames at slow shutter speeds."
            ),
        ];
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Tool definitions in registration order.
    pub fn tools(&self) -> Vec<rmcp::model::Tool> {
        self.entries.iter().map(|e| e.tool.clone()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Create a tool definition from a parameter type.
pub fn create_tool<T: JsonSchema>(name: &'static str, description: &'static str) -> rmcp::model::Tool {
    let schema = schemars::schema_for!(T);
    let input_schema = match serde_json::to_value(&schema).unwrap_or_default() {
        Value::Object(map) => Arc::new(map),
        _ => Arc::new(Map::new()),
    };

    rmcp::model::Tool {
        name: Cow::Borrowed(name),
        description: Some(Cow::Borrowed(description)),
        input_schema,
        annotations: None,
        icons: None,
        meta: None,
        output_schema: None,
        title: None,
    }
}

/// Decode tool arguments; malformed or missing arguments are validation errors.
pub fn parse_args<T: DeserializeOwned>(arguments: Option<Map<String, Value>>) -> Result<T> {
    arguments
        .map(|args| serde_json::from_value(Value::Object(args)))
        .transpose()
        .map_err(|e| Error::validation(format!("Invalid parameters: {}", e)))?
        .ok_or_else(|| Error::validation("Missing parameters"))
}
