//! Tool parameter types and their validation.
//!
//! Every tool takes one of these structs. `validate()` runs before any engine
//! call and either returns the validated request the command builders
//! consume or the full list of field errors.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use vfx_mcp_common::error::Error;

use crate::graph::{GridLayout, parse_color};

// =============================================================================
// Constants
// =============================================================================

/// Default audio bitrate for lossy extraction.
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";

/// Default slideshow frame rate.
pub const DEFAULT_SLIDESHOW_FPS: u32 = 30;

/// Default drawtext font size.
pub const DEFAULT_FONT_SIZE: u32 = 24;

fn default_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

// =============================================================================
// Validation
// =============================================================================

/// Validation error details.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join field errors into a single validation [`Error`].
pub fn into_error(errors: Vec<ValidationError>) -> Error {
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
    Error::validation(messages.join("; "))
}

/// Accumulates field errors for one parameter struct.
#[derive(Debug, Default)]
struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn path(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.fail(field, "path cannot be empty");
        }
    }

    fn paths(&mut self, field: &str, values: &[String], min: usize, max: Option<usize>) {
        if values.len() < min {
            self.fail(
                field,
                format!("at least {} paths are required, got {}", min, values.len()),
            );
        }
        if let Some(max) = max {
            if values.len() > max {
                self.fail(
                    field,
                    format!("at most {} paths are supported, got {}", max, values.len()),
                );
            }
        }
        if values.iter().any(|v| v.trim().is_empty()) {
            self.fail(field, "paths cannot be empty");
        }
    }

    fn range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        if !value.is_finite() || value < min || value > max {
            self.fail(
                field,
                format!("must be between {} and {}, got {}", min, max, value),
            );
        }
    }

    fn positive(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            self.fail(field, format!("must be greater than 0, got {}", value));
        }
    }

    fn non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value < 0.0 {
            self.fail(field, format!("must be non-negative, got {}", value));
        }
    }

    fn bitrate(&mut self, field: &str, value: &str) {
        if !is_bitrate(value) {
            self.fail(
                field,
                format!("'{}' is not a bitrate such as '128k' or '2M'", value),
            );
        }
    }

    fn token(&mut self, field: &str, value: &str) {
        let ok = !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !ok {
            self.fail(field, format!("'{}' is not a valid name", value));
        }
    }

    fn finish(self) -> Result<(), Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// Finish with a value that only exists when its own checks passed.
    fn conclude<T>(self, field: &str, value: Option<T>) -> Result<T, Vec<ValidationError>> {
        self.finish()?;
        value.ok_or_else(|| {
            vec![ValidationError {
                field: field.to_string(),
                message: "invalid value".to_string(),
            }]
        })
    }
}

fn is_bitrate(value: &str) -> bool {
    let digits = value
        .strip_suffix(['k', 'K', 'm', 'M'])
        .unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) && digits != "0"
}

// =============================================================================
// Closed vocabularies
// =============================================================================

/// Audio container/codec for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Aac,
    Flac,
    Ogg,
}

impl AudioFormat {
    /// Encoder passed to `-c:a`.
    pub fn codec(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Wav => "pcm_s16le",
            AudioFormat::Aac => "aac",
            AudioFormat::Flac => "flac",
            AudioFormat::Ogg => "libvorbis",
        }
    }

    /// Whether `-b:a` applies; uncompressed output ignores bitrates.
    pub fn uses_bitrate(&self) -> bool {
        !matches!(self, AudioFormat::Wav)
    }
}

/// Named visual filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VideoFilter {
    Blur,
    Sharpen,
    Brightness,
    Contrast,
    Saturation,
    Vintage,
    Sepia,
    Grayscale,
    Hflip,
    Vflip,
}

/// How multiple audio tracks are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MixMode {
    /// Play all tracks at once through a single mixer.
    #[default]
    Mix,
    /// Play tracks one after another.
    Sequence,
    /// Fold tracks onto the first one pairwise.
    Overlay,
}

/// Transition styles between clips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    #[default]
    Fade,
    Dissolve,
    WipeLeft,
    WipeRight,
    WipeUp,
    WipeDown,
    SlideLeft,
    SlideRight,
    Pixelize,
    Radial,
}

impl TransitionKind {
    /// The `xfade` transition name.
    pub fn xfade_name(&self) -> &'static str {
        match self {
            TransitionKind::Fade => "fade",
            TransitionKind::Dissolve => "dissolve",
            TransitionKind::WipeLeft => "wipeleft",
            TransitionKind::WipeRight => "wiperight",
            TransitionKind::WipeUp => "wipeup",
            TransitionKind::WipeDown => "wipedown",
            TransitionKind::SlideLeft => "slideleft",
            TransitionKind::SlideRight => "slideright",
            TransitionKind::Pixelize => "pixelize",
            TransitionKind::Radial => "radial",
        }
    }
}

/// Split-screen arrangements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SplitLayout {
    /// Two videos side by side.
    #[default]
    Vertical,
    /// Two videos, one above the other.
    Horizontal,
    /// Four videos in a 2x2 grid.
    Quad,
    /// Three videos side by side.
    TripleHorizontal,
    /// Three videos stacked top to bottom.
    TripleVertical,
    /// Two full-frame videos split along the top-right to bottom-left diagonal.
    Diagonal,
}

impl SplitLayout {
    /// Exact number of inputs the layout takes.
    pub fn required_inputs(&self) -> usize {
        match self {
            SplitLayout::Vertical | SplitLayout::Horizontal | SplitLayout::Diagonal => 2,
            SplitLayout::TripleHorizontal | SplitLayout::TripleVertical => 3,
            SplitLayout::Quad => 4,
        }
    }
}

/// Still image format for frame extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpg,
    Bmp,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Bmp => "bmp",
        }
    }
}

/// Named anchor on the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Where an overlay goes: a named anchor or explicit `x:y` expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    Anchor(Anchor),
    Custom { x: String, y: String },
}

impl Position {
    /// Parse `center`, `top_right` (or `top-right`), or `x:y`.
    pub fn parse(value: &str) -> Result<Self, String> {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        let anchor = match normalized.as_str() {
            "center" => Some(Anchor::Center),
            "top" => Some(Anchor::Top),
            "bottom" => Some(Anchor::Bottom),
            "top_left" => Some(Anchor::TopLeft),
            "top_right" => Some(Anchor::TopRight),
            "bottom_left" => Some(Anchor::BottomLeft),
            "bottom_right" => Some(Anchor::BottomRight),
            _ => None,
        };
        if let Some(anchor) = anchor {
            return Ok(Position::Anchor(anchor));
        }

        let expr_ok = |s: &str| {
            !s.is_empty()
                && s.chars()
                    .all(|c| c.is_ascii_alphanumeric() || "_+-*/(). ".contains(c))
        };
        match value.trim().split_once(':') {
            Some((x, y)) if expr_ok(x.trim()) && expr_ok(y.trim()) => Ok(Position::Custom {
                x: x.trim().to_string(),
                y: y.trim().to_string(),
            }),
            _ => Err(format!(
                "'{}' is not a named position (center, top, bottom, top_left, top_right, \
                 bottom_left, bottom_right) or 'x:y'",
                value
            )),
        }
    }
}

// =============================================================================
// Basic operations
// =============================================================================

/// Parameters for trimming a clip.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TrimVideoParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the trimmed video will be saved.
    pub output_path: String,
    /// Start time in seconds.
    pub start_time: f64,
    /// Length of the segment in seconds. Omit to keep everything to the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TrimVideoParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.non_negative("start_time", self.start_time);
        if let Some(duration) = self.duration {
            checks.positive("duration", duration);
        }
        checks.finish()
    }
}

/// Parameters for probing a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GetVideoInfoParams {
    /// Path to the video file.
    pub video_path: String,
}

impl GetVideoInfoParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("video_path", &self.video_path);
        checks.finish()
    }
}

/// Parameters for resizing a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ResizeVideoParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the resized video will be saved.
    pub output_path: String,
    /// Target width in pixels. Height follows the aspect ratio if omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Target height in pixels. Width follows the aspect ratio if omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Scale factor applied to both dimensions (e.g. 0.5). Exclusive with width/height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

/// Validated resize request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeSpec {
    Scale(f64),
    Exact { width: u32, height: u32 },
    Width(u32),
    Height(u32),
}

/// The scale filter's "keep aspect ratio" sentinel.
pub const AUTO_DIMENSION: i32 = -1;

impl ResizeSpec {
    /// The `scale` filter for this request.
    pub fn filter(&self) -> String {
        use crate::command::num;
        match self {
            ResizeSpec::Scale(s) => format!("scale=iw*{0}:ih*{0}", num(*s)),
            ResizeSpec::Exact { width, height } => format!("scale={}:{}", width, height),
            ResizeSpec::Width(w) => format!("scale={}:{}", w, AUTO_DIMENSION),
            ResizeSpec::Height(h) => format!("scale={}:{}", AUTO_DIMENSION, h),
        }
    }
}

impl ResizeVideoParams {
    pub fn validate(&self) -> Result<ResizeSpec, Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        if self.width == Some(0) {
            checks.fail("width", "must be greater than 0");
        }
        if self.height == Some(0) {
            checks.fail("height", "must be greater than 0");
        }
        let spec = match (self.scale, self.width, self.height) {
            (Some(scale), None, None) => {
                checks.positive("scale", scale);
                Some(ResizeSpec::Scale(scale))
            }
            (Some(_), _, _) => {
                checks.fail("scale", "cannot be combined with width or height");
                None
            }
            (None, Some(width), Some(height)) => Some(ResizeSpec::Exact { width, height }),
            (None, Some(width), None) => Some(ResizeSpec::Width(width)),
            (None, None, Some(height)) => Some(ResizeSpec::Height(height)),
            (None, None, None) => {
                checks.fail("width", "one of width, height or scale is required");
                None
            }
        };
        checks.conclude("width", spec)
    }
}

/// Parameters for joining clips end to end.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ConcatenateVideosParams {
    /// Paths of the clips in playback order. They must share codec parameters.
    pub input_paths: Vec<String>,
    /// Path where the joined video will be saved.
    pub output_path: String,
}

impl ConcatenateVideosParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.paths("input_paths", &self.input_paths, 2, None);
        checks.path("output_path", &self.output_path);
        checks.finish()
    }
}

/// Parameters for extracting the audio track.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ExtractAudioParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the audio will be saved.
    pub output_path: String,
    /// Output format. Omit to let the output extension decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<AudioFormat>,
    /// Audio bitrate (e.g. "128k", "192k", "320k"). Default: "192k".
    #[serde(default = "default_bitrate")]
    pub bitrate: String,
}

impl ExtractAudioParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.bitrate("bitrate", &self.bitrate);
        checks.finish()
    }
}

/// Parameters for adding or replacing a soundtrack.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddAudioParams {
    /// Path to the input video file.
    pub video_path: String,
    /// Path to the audio file to add.
    pub audio_path: String,
    /// Path where the result will be saved.
    pub output_path: String,
    /// Replace the existing audio (true) or mix with it (false). Default: true.
    #[serde(default = "default_true")]
    pub replace: bool,
    /// Volume multiplier for the added audio (0.0 to 2.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub audio_volume: f64,
}

impl AddAudioParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("video_path", &self.video_path);
        checks.path("audio_path", &self.audio_path);
        checks.path("output_path", &self.output_path);
        checks.range("audio_volume", self.audio_volume, 0.0, 2.0);
        checks.finish()
    }
}

/// Parameters for applying a named visual filter.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ApplyFilterParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the filtered video will be saved.
    pub output_path: String,
    /// Filter to apply.
    pub filter: VideoFilter,
    /// Filter strength (0.1 to 3.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub strength: f64,
}

impl ApplyFilterParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.range("strength", self.strength, 0.1, 3.0);
        checks.finish()
    }
}

/// Parameters for changing playback speed.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ChangeSpeedParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the result will be saved.
    pub output_path: String,
    /// Speed multiplier: 2.0 plays twice as fast, 0.5 at half speed.
    pub speed: f64,
}

impl ChangeSpeedParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.positive("speed", self.speed);
        checks.finish()
    }
}

/// Parameters for grabbing a single frame.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GenerateThumbnailParams {
    /// Path to the input video file.
    pub video_path: String,
    /// Path where the image will be saved.
    pub output_path: String,
    /// Time of the frame in seconds. Default: middle of the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Thumbnail width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Thumbnail height in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl GenerateThumbnailParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("video_path", &self.video_path);
        checks.path("output_path", &self.output_path);
        if let Some(timestamp) = self.timestamp {
            checks.non_negative("timestamp", timestamp);
        }
        if self.width == Some(0) {
            checks.fail("width", "must be greater than 0");
        }
        if self.height == Some(0) {
            checks.fail("height", "must be greater than 0");
        }
        checks.finish()
    }

    /// Scale filter for the requested size, if any.
    pub fn scale_filter(&self) -> Option<String> {
        match (self.width, self.height) {
            (None, None) => None,
            (w, h) => Some(format!(
                "scale={}:{}",
                w.map_or(AUTO_DIMENSION as i64, i64::from),
                h.map_or(AUTO_DIMENSION as i64, i64::from)
            )),
        }
    }
}

/// Parameters for transcoding.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ConvertFormatParams {
    /// Path to the input file.
    pub input_path: String,
    /// Path where the converted file will be saved.
    pub output_path: String,
    /// Container format (e.g. "mp4", "webm", "matroska"). Default: from extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Video encoder (e.g. "libx264", "libvpx-vp9").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    /// Audio encoder (e.g. "aac", "libopus").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    /// Video bitrate (e.g. "2M").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_bitrate: Option<String>,
    /// Audio bitrate (e.g. "128k").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_bitrate: Option<String>,
}

impl ConvertFormatParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        if let Some(format) = &self.format {
            checks.token("format", format);
        }
        if let Some(codec) = &self.video_codec {
            checks.token("video_codec", codec);
        }
        if let Some(codec) = &self.audio_codec {
            checks.token("audio_codec", codec);
        }
        if let Some(bitrate) = &self.video_bitrate {
            checks.bitrate("video_bitrate", bitrate);
        }
        if let Some(bitrate) = &self.audio_bitrate {
            checks.bitrate("audio_bitrate", bitrate);
        }
        checks.finish()
    }
}

// =============================================================================
// Advanced operations
// =============================================================================

fn default_image_duration() -> f64 {
    3.0
}

fn default_slide_transition() -> f64 {
    0.5
}

fn default_fps() -> u32 {
    DEFAULT_SLIDESHOW_FPS
}

/// Parameters for building a slideshow from still images.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateSlideshowParams {
    /// Image paths in display order.
    pub image_paths: Vec<String>,
    /// Path where the video will be saved.
    pub output_path: String,
    /// Seconds each image is shown. Default: 3.0.
    #[serde(default = "default_image_duration")]
    pub duration_per_image: f64,
    /// Crossfade length in seconds; 0 for hard cuts. Default: 0.5.
    #[serde(default = "default_slide_transition")]
    pub transition_duration: f64,
    /// Output frame rate (1 to 120). Default: 30.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Output size as "WxH" (e.g. "1920x1080"). Default: the first image's size rounded to even sides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

/// Validated slideshow request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideshowSpec {
    pub resolution: Option<(u32, u32)>,
}

fn parse_resolution(value: &str) -> Option<(u32, u32)> {
    let (w, h) = value.trim().to_lowercase().split_once('x').map(|(w, h)| {
        (w.trim().parse::<u32>().ok(), h.trim().parse::<u32>().ok())
    })?;
    match (w?, h?) {
        (w, h) if w > 0 && h > 0 => Some((w, h)),
        _ => None,
    }
}

impl CreateSlideshowParams {
    pub fn validate(&self) -> Result<SlideshowSpec, Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.paths("image_paths", &self.image_paths, 1, None);
        checks.path("output_path", &self.output_path);
        checks.positive("duration_per_image", self.duration_per_image);
        checks.non_negative("transition_duration", self.transition_duration);
        if self.transition_duration >= self.duration_per_image {
            checks.fail(
                "transition_duration",
                "must be shorter than duration_per_image",
            );
        }
        if !(1..=120).contains(&self.fps) {
            checks.fail("fps", format!("must be between 1 and 120, got {}", self.fps));
        }
        let resolution = match &self.resolution {
            Some(value) => {
                let parsed = parse_resolution(value);
                if parsed.is_none() {
                    checks.fail("resolution", format!("'{}' must be in format 'WxH'", value));
                }
                parsed
            }
            None => None,
        };
        checks.finish()?;
        Ok(SlideshowSpec { resolution })
    }
}

/// Parameters for dumping frames as images.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ExtractFramesParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Directory that receives the images; created if missing.
    pub output_dir: String,
    /// Start time in seconds. Default: 0.
    #[serde(default)]
    pub start_time: f64,
    /// End time in seconds. Default: end of the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
    /// Keep every Nth frame. Default: 1 (every frame).
    #[serde(default = "default_frame_interval")]
    pub frame_interval: u32,
    /// Image format. Default: png.
    #[serde(default)]
    pub image_format: ImageFormat,
}

fn default_frame_interval() -> u32 {
    1
}

impl ExtractFramesParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_dir", &self.output_dir);
        checks.non_negative("start_time", self.start_time);
        if let Some(end) = self.end_time {
            if !end.is_finite() || end <= self.start_time {
                checks.fail("end_time", "must be greater than start_time");
            }
        }
        if self.frame_interval == 0 {
            checks.fail("frame_interval", "must be at least 1");
        }
        checks.finish()
    }
}

fn default_position() -> String {
    "center".to_string()
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_font_color() -> String {
    "white".to_string()
}

/// Parameters for burning text into a video.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct AddTextOverlayParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the result will be saved.
    pub output_path: String,
    /// Text to draw.
    pub text: String,
    /// "center", "top", "bottom", "top_left", "top_right", "bottom_left",
    /// "bottom_right", or custom "x:y". Default: "center".
    #[serde(default = "default_position")]
    pub position: String,
    /// Font size in points (8 to 500). Default: 24.
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Font colour name or hex code. Default: "white".
    #[serde(default = "default_font_color")]
    pub font_color: String,
    /// Colour of a box drawn behind the text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Second at which the text appears. Default: 0.
    #[serde(default)]
    pub start_time: f64,
    /// How long the text stays, in seconds. Default: until the end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Validated text overlay request.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlaySpec {
    pub position: Position,
    pub font_color: String,
    pub background_color: Option<String>,
}

/// Accept colour names drawtext understands as well as hex codes.
fn drawtext_color(value: &str) -> Option<String> {
    if let Ok(hex) = parse_color(value) {
        return Some(hex);
    }
    let value = value.trim();
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '@' || c == '.');
    plain.then(|| value.to_string())
}

impl AddTextOverlayParams {
    pub fn validate(&self) -> Result<TextOverlaySpec, Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        if self.text.trim().is_empty() {
            checks.fail("text", "cannot be empty");
        }
        let position = Position::parse(&self.position).map_err(|e| checks.fail("position", e)).ok();
        if !(8..=500).contains(&self.font_size) {
            checks.fail(
                "font_size",
                format!("must be between 8 and 500, got {}", self.font_size),
            );
        }
        let font_color = drawtext_color(&self.font_color);
        if font_color.is_none() {
            checks.fail("font_color", format!("'{}' is not a colour", self.font_color));
        }
        let background_color = match &self.background_color {
            Some(value) => {
                let parsed = drawtext_color(value);
                if parsed.is_none() {
                    checks.fail("background_color", format!("'{}' is not a colour", value));
                }
                parsed
            }
            None => None,
        };
        checks.non_negative("start_time", self.start_time);
        if let Some(duration) = self.duration {
            checks.positive("duration", duration);
        }
        let spec = position.zip(font_color).map(|(position, font_color)| TextOverlaySpec {
            position,
            font_color,
            background_color,
        });
        checks.conclude("position", spec)
    }
}

fn default_layout() -> String {
    "2x2".to_string()
}

/// Parameters for a grid mosaic.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CreateMosaicParams {
    /// Input videos, filled into the grid row by row.
    pub input_paths: Vec<String>,
    /// Path where the mosaic will be saved.
    pub output_path: String,
    /// Grid as "WxH" columns by rows (e.g. "2x2", "3x1"), each side 1 to 16. Default: "2x2".
    #[serde(default = "default_layout")]
    pub layout: String,
    /// Index of the input whose audio is kept; -1 for silence. Default: 0.
    #[serde(default)]
    pub audio_source: i32,
}

/// Validated mosaic request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicSpec {
    pub grid: GridLayout,
    pub audio_source: Option<usize>,
}

impl CreateMosaicParams {
    pub fn validate(&self) -> Result<MosaicSpec, Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("output_path", &self.output_path);
        if self.input_paths.iter().any(|p| p.trim().is_empty()) {
            checks.fail("input_paths", "paths cannot be empty");
        }
        let grid = match GridLayout::parse(&self.layout) {
            Ok(grid) => {
                if self.input_paths.len() < grid.cells() {
                    checks.fail(
                        "input_paths",
                        format!(
                            "layout {} requires {} videos, but only {} provided",
                            grid,
                            grid.cells(),
                            self.input_paths.len()
                        ),
                    );
                }
                Some(grid)
            }
            Err(e) => {
                let message = match e {
                    Error::Validation(message) => message,
                    other => other.to_string(),
                };
                checks.fail("layout", message.trim_start_matches("layout: "));
                None
            }
        };
        let audio_source = match self.audio_source {
            -1 => None,
            i if i >= 0 => Some(i as usize),
            i => {
                checks.fail("audio_source", format!("must be -1 or an input index, got {}", i));
                None
            }
        };
        if let (Some(grid), Some(index)) = (grid, audio_source) {
            if index >= grid.cells() {
                checks.fail(
                    "audio_source",
                    format!("{} is outside the {} videos used by the grid", index, grid.cells()),
                );
            }
        }
        let spec = grid.map(|grid| MosaicSpec { grid, audio_source });
        checks.conclude("layout", spec)
    }
}

fn default_pip_position() -> String {
    "top_right".to_string()
}

fn default_pip_scale() -> f64 {
    0.25
}

fn default_margin() -> u32 {
    20
}

/// Parameters for picture-in-picture.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct PictureInPictureParams {
    /// Path to the main (background) video.
    pub main_video_path: String,
    /// Path to the inset video.
    pub overlay_video_path: String,
    /// Path where the result will be saved.
    pub output_path: String,
    /// Named position ("top_right", "bottom_left", "center", ...) or "x:y". Default: "top_right".
    #[serde(default = "default_pip_position")]
    pub position: String,
    /// Inset size relative to the main video (0.1 to 1.0). Default: 0.25.
    #[serde(default = "default_pip_scale")]
    pub scale: f64,
    /// Inset opacity (0.0 to 1.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub opacity: f64,
    /// Distance from the frame edge in pixels for named positions. Default: 20.
    #[serde(default = "default_margin")]
    pub margin: u32,
}

impl PictureInPictureParams {
    pub fn validate(&self) -> Result<Position, Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("main_video_path", &self.main_video_path);
        checks.path("overlay_video_path", &self.overlay_video_path);
        checks.path("output_path", &self.output_path);
        checks.range("scale", self.scale, 0.1, 1.0);
        checks.range("opacity", self.opacity, 0.0, 1.0);
        let position = Position::parse(&self.position).map_err(|e| checks.fail("position", e)).ok();
        checks.conclude("position", position)
    }
}

/// Parameters for colour grading.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ColorGradingParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the graded video will be saved.
    pub output_path: String,
    /// Brightness offset (-1.0 to 1.0). Default: 0.
    #[serde(default)]
    pub brightness: f64,
    /// Contrast multiplier (0.0 to 3.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub contrast: f64,
    /// Saturation multiplier (0.0 to 3.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub saturation: f64,
    /// Gamma (0.1 to 3.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub gamma: f64,
    /// Colour temperature shift (-2000 to 2000); positive is warmer. Default: 0.
    #[serde(default)]
    pub temperature: f64,
    /// Green/magenta tint (-100 to 100). Default: 0.
    #[serde(default)]
    pub tint: f64,
}

impl ColorGradingParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.range("brightness", self.brightness, -1.0, 1.0);
        checks.range("contrast", self.contrast, 0.0, 3.0);
        checks.range("saturation", self.saturation, 0.0, 3.0);
        checks.range("gamma", self.gamma, 0.1, 3.0);
        checks.range("temperature", self.temperature, -2000.0, 2000.0);
        checks.range("tint", self.tint, -100.0, 100.0);
        checks.finish()
    }
}

fn default_speed_factor() -> f64 {
    10.0
}

/// Parameters for a time-lapse.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TimeLapseParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the time-lapse will be saved.
    pub output_path: String,
    /// Speed-up factor (2 to 100). Default: 10.
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,
    /// Remove camera shake before sampling frames. Default: false.
    #[serde(default)]
    pub stabilize: bool,
    /// Interpolate frames for smoother motion above 5x. Default: true.
    #[serde(default = "default_true")]
    pub smooth_motion: bool,
}

impl TimeLapseParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.range("speed_factor", self.speed_factor, 2.0, 100.0);
        checks.finish()
    }
}

/// Parameters for merging audio tracks.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MergeAudioParams {
    /// Audio files to merge (at least 2).
    pub audio_paths: Vec<String>,
    /// Path where the merged audio will be saved.
    pub output_path: String,
    /// Per-track volume (0.0 to 2.0), one per path. Default: all 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<f64>>,
    /// Per-track start delay in seconds, one per path. Default: all 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delays: Option<Vec<f64>>,
    /// How tracks are combined. Default: mix.
    #[serde(default)]
    pub mix_mode: MixMode,
}

/// One validated input track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSpec {
    pub volume: f64,
    pub delay: f64,
}

impl MergeAudioParams {
    pub fn validate(&self) -> Result<Vec<TrackSpec>, Vec<ValidationError>> {
        let mut checks = Checks::default();
        let count = self.audio_paths.len();
        checks.paths("audio_paths", &self.audio_paths, 2, None);
        checks.path("output_path", &self.output_path);
        if let Some(volumes) = &self.volumes {
            if volumes.len() != count {
                checks.fail(
                    "volumes",
                    format!("expected {} values (one per track), got {}", count, volumes.len()),
                );
            }
            for volume in volumes {
                checks.range("volumes", *volume, 0.0, 2.0);
            }
        }
        if let Some(delays) = &self.delays {
            if delays.len() != count {
                checks.fail(
                    "delays",
                    format!("expected {} values (one per track), got {}", count, delays.len()),
                );
            }
            for delay in delays {
                checks.non_negative("delays", *delay);
            }
        }
        checks.finish()?;

        Ok((0..count)
            .map(|i| TrackSpec {
                volume: self.volumes.as_ref().map_or(1.0, |v| v[i]),
                delay: self.delays.as_ref().map_or(0.0, |d| d[i]),
            })
            .collect())
    }
}

fn default_key_color() -> String {
    "green".to_string()
}

fn default_similarity() -> f64 {
    0.3
}

fn default_blend() -> f64 {
    0.1
}

fn default_spill() -> f64 {
    0.1
}

/// Parameters for chroma keying.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct GreenScreenParams {
    /// Path to the foreground video shot against the key colour.
    pub input_path: String,
    /// Path where the result will be saved.
    pub output_path: String,
    /// Replacement background video or image. Without one, keyed pixels are
    /// transparent in .mov and .webm output and black in other containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_path: Option<String>,
    /// Key colour name ("green", "blue", ...) or hex code. Default: "green".
    #[serde(default = "default_key_color")]
    pub chroma_key_color: String,
    /// Colour distance treated as key (clamped to 0.0..1.0). Default: 0.3.
    #[serde(default = "default_similarity")]
    pub similarity: f64,
    /// Edge softness (clamped to 0.0..1.0). Default: 0.1.
    #[serde(default = "default_blend")]
    pub blend: f64,
    /// Strength of colour spill removal (clamped to 0.0..1.0). Default: 0.1.
    #[serde(default = "default_spill")]
    pub spill_reduction: f64,
}

/// Which despill model applies to a key colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DespillKind {
    Green,
    Blue,
}

impl DespillKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DespillKind::Green => "green",
            DespillKind::Blue => "blue",
        }
    }
}

/// Validated chroma key request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromaKeySpec {
    /// Key colour as `0xRRGGBB`.
    pub color: String,
    pub similarity: f64,
    pub blend: f64,
    pub spill: f64,
    pub despill: Option<DespillKind>,
}

fn unknown_color(value: &str) -> String {
    format!("'{}' is not a known colour name, #RRGGBB or 0xRRGGBB", value)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

impl GreenScreenParams {
    pub fn validate(&self) -> Result<ChromaKeySpec, Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        if let Some(background) = &self.background_path {
            checks.path("background_path", background);
        }
        let color = parse_color(&self.chroma_key_color)
            .map_err(|_| checks.fail("chroma_key_color", unknown_color(&self.chroma_key_color)))
            .ok();
        let color = checks.conclude("chroma_key_color", color)?;

        let despill = match color.as_str() {
            "0x00FF00" => Some(DespillKind::Green),
            "0x0000FF" => Some(DespillKind::Blue),
            _ => None,
        };
        Ok(ChromaKeySpec {
            color,
            similarity: clamp_unit(self.similarity),
            blend: clamp_unit(self.blend),
            spill: clamp_unit(self.spill_reduction),
            despill,
        })
    }
}

/// Parameters for joining clips with transitions.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct TransitionsParams {
    /// Clips in playback order (at least 2).
    pub video_paths: Vec<String>,
    /// Path where the result will be saved.
    pub output_path: String,
    /// Transition style. Default: fade.
    #[serde(default)]
    pub transition_type: TransitionKind,
    /// Transition length in seconds (0.1 to 5.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub transition_duration: f64,
}

impl TransitionsParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.paths("video_paths", &self.video_paths, 2, None);
        checks.path("output_path", &self.output_path);
        checks.range("transition_duration", self.transition_duration, 0.1, 5.0);
        checks.finish()
    }
}

fn default_border_width() -> u32 {
    2
}

fn default_border_color() -> String {
    "black".to_string()
}

/// Parameters for split-screen composition.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct SplitScreenParams {
    /// Videos to arrange (2 to 4, as the layout requires).
    pub video_paths: Vec<String>,
    /// Path where the result will be saved.
    pub output_path: String,
    /// Arrangement. Default: vertical (two side by side).
    #[serde(default)]
    pub layout: SplitLayout,
    /// Border between panes in pixels (0 to 20); the diagonal layout has none. Default: 2.
    #[serde(default = "default_border_width")]
    pub border_width: u32,
    /// Border colour name or hex code. Default: "black".
    #[serde(default = "default_border_color")]
    pub border_color: String,
}

impl SplitScreenParams {
    /// Returns the border colour in `0xRRGGBB` form.
    pub fn validate(&self) -> Result<String, Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.paths("video_paths", &self.video_paths, 2, Some(4));
        checks.path("output_path", &self.output_path);
        let required = self.layout.required_inputs();
        if (2..=4).contains(&self.video_paths.len()) && self.video_paths.len() != required {
            checks.fail(
                "video_paths",
                format!(
                    "{:?} layout requires exactly {} videos, got {}",
                    self.layout,
                    required,
                    self.video_paths.len()
                ),
            );
        }
        if self.border_width > 20 {
            checks.fail(
                "border_width",
                format!("must be between 0 and 20, got {}", self.border_width),
            );
        }
        let color = parse_color(&self.border_color)
            .map_err(|_| checks.fail("border_color", unknown_color(&self.border_color)))
            .ok();
        checks.conclude("border_color", color)
    }
}

fn default_shakiness() -> u32 {
    5
}

fn default_smoothing() -> u32 {
    30
}

/// Parameters for two-pass stabilization.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct StabilizationParams {
    /// Path to the shaky input video.
    pub input_path: String,
    /// Path where the stabilized video will be saved.
    pub output_path: String,
    /// How shaky the footage is (1 to 10). Default: 5.
    #[serde(default = "default_shakiness")]
    pub strength: u32,
    /// Frames used to smooth camera motion (1 to 100). Default: 30.
    #[serde(default = "default_smoothing")]
    pub smoothing: u32,
    /// Fill borders with black (true) or keep the previous frame (false). Default: true.
    #[serde(default = "default_true")]
    pub crop_black: bool,
    /// Extra zoom to hide borders (0.0 to 0.2). Default: 0.
    #[serde(default)]
    pub zoom: f64,
}

impl StabilizationParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        if !(1..=10).contains(&self.strength) {
            checks.fail("strength", format!("must be between 1 and 10, got {}", self.strength));
        }
        if !(1..=100).contains(&self.smoothing) {
            checks.fail(
                "smoothing",
                format!("must be between 1 and 100, got {}", self.smoothing),
            );
        }
        checks.range("zoom", self.zoom, 0.0, 0.2);
        checks.finish()
    }
}

fn default_scene_threshold() -> f64 {
    0.3
}

/// Parameters for scene detection.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct DetectScenesParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Scene score above which a frame starts a new scene (0.0 to 1.0). Default: 0.3.
    #[serde(default = "default_scene_threshold")]
    pub threshold: f64,
    /// Minimum scene length in seconds; closer cuts are dropped. Default: 1.0.
    #[serde(default = "default_one")]
    pub min_scene_length: f64,
}

impl DetectScenesParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.range("threshold", self.threshold, 0.0, 1.0);
        checks.non_negative("min_scene_length", self.min_scene_length);
        checks.finish()
    }
}

// =============================================================================
// Motion effects
// =============================================================================

/// Rate of change across a zoom/pan move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Eased value of the progress expression `p` (0 to 1).
    pub fn apply(&self, p: &str) -> String {
        match self {
            Easing::Linear => p.to_string(),
            Easing::EaseIn => format!("{p}*{p}"),
            Easing::EaseOut => format!("1-pow(1-{p},2)"),
            Easing::EaseInOut => format!("if(lt({p},0.5),2*{p}*{p},1-2*pow(1-{p},2))"),
        }
    }
}

fn default_start_zoom() -> f64 {
    1.0
}

fn default_end_zoom() -> f64 {
    1.5
}

fn default_center() -> f64 {
    0.5
}

/// Parameters for a Ken Burns style zoom and pan.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ZoomPanParams {
    /// Path to the input video or still image.
    pub input_path: String,
    /// Path where the effect will be saved.
    pub output_path: String,
    /// Zoom factor at the start (1.0 to 5.0). Default: 1.0.
    #[serde(default = "default_start_zoom")]
    pub start_zoom: f64,
    /// Zoom factor at the end (1.0 to 5.0). Default: 1.5.
    #[serde(default = "default_end_zoom")]
    pub end_zoom: f64,
    /// Horizontal centre at the start, as a fraction of the width. Default: 0.5.
    #[serde(default = "default_center")]
    pub start_x: f64,
    /// Vertical centre at the start, as a fraction of the height. Default: 0.5.
    #[serde(default = "default_center")]
    pub start_y: f64,
    /// Horizontal centre at the end. Default: 0.5.
    #[serde(default = "default_center")]
    pub end_x: f64,
    /// Vertical centre at the end. Default: 0.5.
    #[serde(default = "default_center")]
    pub end_y: f64,
    /// Length of the move in seconds. Default: the input's duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Easing curve: linear, ease_in, ease_out or ease_in_out. Default: linear.
    #[serde(default)]
    pub easing: Easing,
}

impl ZoomPanParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.range("start_zoom", self.start_zoom, 1.0, 5.0);
        checks.range("end_zoom", self.end_zoom, 1.0, 5.0);
        checks.range("start_x", self.start_x, 0.0, 1.0);
        checks.range("start_y", self.start_y, 0.0, 1.0);
        checks.range("end_x", self.end_x, 0.0, 1.0);
        checks.range("end_y", self.end_y, 0.0, 1.0);
        if let Some(duration) = self.duration {
            checks.range("duration", duration, 0.1, 600.0);
        }
        checks.finish()
    }
}

fn default_loop_duration() -> f64 {
    10.0
}

/// Parameters for a looping clip.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct LoopVideoParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the loop will be saved.
    pub output_path: String,
    /// Length of the output in seconds (1 to 120); the input repeats to fill it. Default: 10.
    #[serde(default = "default_loop_duration")]
    pub loop_duration: f64,
    /// Seconds over which the end blends back into the start (0.1 to 5.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub crossfade_duration: f64,
    /// Blend the loop point so playback wraps without a visible cut. Default: true.
    #[serde(default = "default_true")]
    pub seamless: bool,
}

impl LoopVideoParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.range("loop_duration", self.loop_duration, 1.0, 120.0);
        checks.range("crossfade_duration", self.crossfade_duration, 0.1, 5.0);
        if self.crossfade_duration >= self.loop_duration / 2.0 {
            checks.fail(
                "crossfade_duration",
                "must be shorter than half of loop_duration",
            );
        }
        checks.finish()
    }
}

fn default_shutter_speed() -> f64 {
    0.5
}

/// Parameters for simulated motion blur.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MotionBlurParams {
    /// Path to the input video file.
    pub input_path: String,
    /// Path where the blurred video will be saved.
    pub output_path: String,
    /// Blur strength (0.1 to 5.0). Default: 1.0.
    #[serde(default = "default_one")]
    pub blur_strength: f64,
    /// Direction of motion in degrees; 0 is horizontal, 90 vertical. Default: 0.
    #[serde(default)]
    pub angle: f64,
    /// Simulated shutter speed (0.1 to 1.0); lower values smear more frames together. Default: 0.5.
    #[serde(default = "default_shutter_speed")]
    pub shutter_speed: f64,
}

impl MotionBlurParams {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut checks = Checks::default();
        checks.path("input_path", &self.input_path);
        checks.path("output_path", &self.output_path);
        checks.range("blur_strength", self.blur_strength, 0.1, 5.0);
        checks.range("angle", self.angle, 0.0, 360.0);
        checks.range("shutter_speed", self.shutter_speed, 0.1, 1.0);
        checks.finish()
    }
}
