//! Editing operations.
//!
//! [`EditorHandler`] owns the engine and configuration. Each operation
//! validates its parameters, probes inputs where the command depends on them,
//! builds the command and runs it. Validation always happens before the
//! engine is touched.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::{debug, info, instrument};
use uuid::Uuid;
use vfx_mcp_common::config::Config;
use vfx_mcp_common::error::{Error, Result};

use crate::builders::{self, ClipFormat};
use crate::command::FfmpegCommand;
use crate::engine::{EngineOutput, FfmpegEngine, MediaEngine};
use crate::params::*;
use crate::probe::VideoMetadata;
use crate::scenes::{self, SceneReport};

/// Handler for all editing tools.
pub struct EditorHandler {
    engine: Arc<dyn MediaEngine>,
    config: Config,
}

impl EditorHandler {
    /// Handler backed by the ffmpeg binaries named in `config`.
    pub fn new(config: Config) -> Self {
        let engine = Arc::new(FfmpegEngine::new(&config));
        Self::with_engine(config, engine)
    }

    pub fn with_engine(config: Config, engine: Arc<dyn MediaEngine>) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Probe a file into [`VideoMetadata`].
    pub async fn probe(&self, path: impl AsRef<Path>) -> Result<VideoMetadata> {
        let json = self.engine.probe(path.as_ref()).await?;
        VideoMetadata::from_probe(&json)
    }

    async fn run(&self, command: FfmpegCommand) -> Result<EngineOutput> {
        self.engine.run(&command).await
    }

    async fn dimensions_of(&self, path: &str) -> Result<(u32, u32)> {
        self.probe(path)
            .await?
            .dimensions()
            .ok_or_else(|| Error::ffmpeg(format!("No video stream found in '{}'", path)))
    }

    // =========================================================================
    // Basic operations
    // =========================================================================

    /// Cut a segment out of a video without re-encoding.
    #[instrument(level = "info", skip(self))]
    pub async fn trim_video(&self, params: TrimVideoParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        self.run(builders::trim(&params)).await?;

        let result = format!("Video trimmed and saved to {}", params.output_path);
        info!(output = %params.output_path, "Trimmed video");
        Ok(result)
    }

    #[instrument(level = "info", skip(self))]
    pub async fn get_video_info(&self, params: GetVideoInfoParams) -> Result<VideoMetadata> {
        params.validate().map_err(into_error)?;
        let metadata = self.probe(&params.video_path).await?;
        info!(duration = metadata.duration, format = %metadata.format, "Got video info");
        Ok(metadata)
    }

    #[instrument(level = "info", skip(self))]
    pub async fn resize_video(&self, params: ResizeVideoParams) -> Result<String> {
        let spec = params.validate().map_err(into_error)?;
        self.run(builders::resize(&params, spec)).await?;

        info!(output = %params.output_path, filter = %spec.filter(), "Resized video");
        Ok(format!("Video resized and saved to {}", params.output_path))
    }

    /// Join clips with the concat demuxer.
    ///
    /// The list file is written next to the output under a unique name and
    /// removed whether or not ffmpeg succeeds.
    #[instrument(level = "info", skip(self))]
    pub async fn concatenate_videos(&self, params: ConcatenateVideosParams) -> Result<String> {
        params.validate().map_err(into_error)?;

        let inputs = params
            .input_paths
            .iter()
            .map(std::path::absolute)
            .collect::<std::io::Result<Vec<PathBuf>>>()?;
        let list_path = sibling_temp_file(&params.output_path, "concat", "txt");
        tokio::fs::write(&list_path, builders::concat_list(&inputs)).await?;
        debug!(list = %list_path.display(), count = inputs.len(), "Wrote concat list");

        let result = self
            .run(builders::concatenate(&list_path, &params.output_path))
            .await;
        let _ = tokio::fs::remove_file(&list_path).await;
        result?;

        info!(output = %params.output_path, count = inputs.len(), "Concatenated videos");
        Ok(format!(
            "Concatenated {} videos and saved to {}",
            inputs.len(),
            params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn extract_audio(&self, params: ExtractAudioParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        self.run(builders::extract_audio(&params)).await?;

        info!(output = %params.output_path, "Extracted audio");
        Ok(format!("Audio extracted and saved to {}", params.output_path))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn add_audio(&self, params: AddAudioParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let video_has_audio = if params.replace {
            false
        } else {
            self.probe(&params.video_path).await?.has_audio()
        };
        self.run(builders::add_audio(&params, video_has_audio)).await?;

        let action = if params.replace || !video_has_audio { "replaced" } else { "mixed" };
        info!(output = %params.output_path, action, "Added audio");
        Ok(format!("Audio {} and saved to {}", action, params.output_path))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn apply_filter(&self, params: ApplyFilterParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        self.run(builders::apply_filter(&params)).await?;

        info!(output = %params.output_path, filter = ?params.filter, "Applied filter");
        Ok(format!(
            "Filter {:?} applied and saved to {}",
            params.filter, params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn change_speed(&self, params: ChangeSpeedParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let has_audio = self.probe(&params.input_path).await?.has_audio();
        self.run(builders::change_speed(&params, has_audio)).await?;

        info!(output = %params.output_path, speed = params.speed, has_audio, "Changed speed");
        Ok(format!(
            "Speed changed to {}x and saved to {}",
            params.speed, params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn generate_thumbnail(&self, params: GenerateThumbnailParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let timestamp = match params.timestamp {
            Some(t) => t,
            None => self.probe(&params.video_path).await?.duration / 2.0,
        };
        self.run(builders::thumbnail(&params, timestamp)).await?;

        info!(output = %params.output_path, timestamp, "Generated thumbnail");
        Ok(format!(
            "Thumbnail at {:.2}s saved to {}",
            timestamp, params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn convert_format(&self, params: ConvertFormatParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        self.run(builders::convert_format(&params)).await?;

        info!(output = %params.output_path, "Converted format");
        Ok(format!("Converted and saved to {}", params.output_path))
    }

    // =========================================================================
    // Advanced operations
    // =========================================================================

    #[instrument(level = "info", skip(self))]
    pub async fn create_video_slideshow(&self, params: CreateSlideshowParams) -> Result<String> {
        let mut spec = params.validate().map_err(into_error)?;
        if spec.resolution.is_none() {
            spec.resolution = self
                .probe(&params.image_paths[0])
                .await?
                .dimensions()
                .map(builders::even_size);
            debug!(resolution = ?spec.resolution, "Slideshow canvas from first image");
        }
        self.run(builders::slideshow(&params, spec)).await?;

        info!(output = %params.output_path, images = params.image_paths.len(), "Created slideshow");
        Ok(format!(
            "Slideshow of {} images saved to {}",
            params.image_paths.len(),
            params.output_path
        ))
    }

    /// Dump frames as images; returns how many were written.
    #[instrument(level = "info", skip(self))]
    pub async fn extract_frames(&self, params: ExtractFramesParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let output_dir = PathBuf::from(&params.output_dir);
        tokio::fs::create_dir_all(&output_dir).await?;

        let before = frame_snapshot(&output_dir, params.image_format).await?;
        self.run(builders::extract_frames(&params, &output_dir)).await?;
        let count = count_new_frames(&output_dir, params.image_format, &before).await?;

        info!(output_dir = %params.output_dir, count, "Extracted frames");
        Ok(format!(
            "Extracted {} frames to {}",
            count, params.output_dir
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn add_text_overlay(&self, params: AddTextOverlayParams) -> Result<String> {
        let spec = params.validate().map_err(into_error)?;
        self.run(builders::text_overlay(&params, &spec)).await?;

        info!(output = %params.output_path, "Added text overlay");
        Ok(format!("Text overlay added and saved to {}", params.output_path))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn create_video_mosaic(&self, params: CreateMosaicParams) -> Result<String> {
        let spec = params.validate().map_err(into_error)?;
        self.run(builders::mosaic(&params, spec)).await?;

        info!(output = %params.output_path, layout = %spec.grid, "Created mosaic");
        Ok(format!(
            "Mosaic {} saved to {}",
            spec.grid, params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn create_picture_in_picture(&self, params: PictureInPictureParams) -> Result<String> {
        let position = params.validate().map_err(into_error)?;
        let main = self.dimensions_of(&params.main_video_path).await?;
        self.run(builders::picture_in_picture(&params, &position, main)).await?;

        info!(output = %params.output_path, width = main.0, height = main.1, "Created picture-in-picture");
        Ok(format!(
            "Picture-in-picture saved to {}",
            params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn apply_color_grading(&self, params: ColorGradingParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        self.run(builders::color_grading(&params)).await?;

        info!(output = %params.output_path, "Applied color grading");
        Ok(format!("Color grading applied and saved to {}", params.output_path))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn create_time_lapse(&self, params: TimeLapseParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let has_audio = self.probe(&params.input_path).await?.has_audio();
        self.run(builders::time_lapse(&params, has_audio)).await?;

        info!(output = %params.output_path, factor = params.speed_factor, "Created time-lapse");
        Ok(format!(
            "Time-lapse ({}x) saved to {}",
            builders::timelapse_step(params.speed_factor),
            params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn merge_audio_tracks(&self, params: MergeAudioParams) -> Result<String> {
        let tracks = params.validate().map_err(into_error)?;
        self.run(builders::merge_audio(&params, &tracks)).await?;

        info!(output = %params.output_path, tracks = tracks.len(), mode = ?params.mix_mode, "Merged audio");
        Ok(format!(
            "Merged {} audio tracks and saved to {}",
            tracks.len(),
            params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn create_green_screen_effect(&self, params: GreenScreenParams) -> Result<String> {
        let spec = params.validate().map_err(into_error)?;
        let foreground = match params.background_path {
            Some(_) => Some(self.dimensions_of(&params.input_path).await?),
            None => None,
        };
        self.run(builders::green_screen(&params, &spec, foreground)).await?;

        info!(output = %params.output_path, color = %spec.color, "Applied chroma key");
        Ok(format!(
            "Green screen effect applied and saved to {}",
            params.output_path
        ))
    }

    /// Join clips with `xfade` transitions.
    ///
    /// Every clip is probed; clips that are not longer than the transition
    /// are rejected before ffmpeg runs.
    #[instrument(level = "info", skip(self))]
    pub async fn create_video_transitions(&self, params: TransitionsParams) -> Result<String> {
        params.validate().map_err(into_error)?;

        let mut durations = Vec::with_capacity(params.video_paths.len());
        let mut format = None;
        for path in &params.video_paths {
            let metadata = self.probe(path).await?;
            if format.is_none() {
                format = metadata.video.as_ref().map(|v| ClipFormat {
                    width: v.width,
                    height: v.height,
                    fps: v.fps,
                });
            }
            durations.push(metadata.duration);
        }
        let format =
            format.ok_or_else(|| Error::ffmpeg(format!("No video stream found in '{}'", params.video_paths[0])))?;

        let too_short: Vec<String> = params
            .video_paths
            .iter()
            .zip(&durations)
            .filter(|(_, d)| **d <= params.transition_duration)
            .map(|(p, d)| format!("'{}' is {:.2}s", p, d))
            .collect();
        if !too_short.is_empty() {
            return Err(Error::validation(format!(
                "video_paths: every clip must be longer than the {}s transition ({})",
                params.transition_duration,
                too_short.join(", ")
            )));
        }

        self.run(builders::transitions(&params, &durations, format)).await?;

        info!(
            output = %params.output_path,
            clips = durations.len(),
            transition = params.transition_type.xfade_name(),
            "Created transitions"
        );
        Ok(format!(
            "Joined {} clips with {} transitions and saved to {}",
            durations.len(),
            params.transition_type.xfade_name(),
            params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn create_split_screen(&self, params: SplitScreenParams) -> Result<String> {
        let border_color = params.validate().map_err(into_error)?;
        self.run(builders::split_screen(&params, &border_color)).await?;

        info!(output = %params.output_path, layout = ?params.layout, "Created split screen");
        Ok(format!("Split screen saved to {}", params.output_path))
    }

    /// Two-pass vid.stab stabilization.
    #[instrument(level = "info", skip(self))]
    pub async fn apply_video_stabilization(&self, params: StabilizationParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let transforms = sibling_temp_file(&params.output_path, "stab", "trf");

        let result = async {
            self.run(builders::stabilize_detect(&params, &transforms)).await?;
            debug!(transforms = %transforms.display(), "Motion analysis complete");
            self.run(builders::stabilize_transform(&params, &transforms)).await
        }
        .await;
        let _ = tokio::fs::remove_file(&transforms).await;
        result?;

        info!(output = %params.output_path, strength = params.strength, smoothing = params.smoothing, "Stabilized video");
        Ok(format!(
            "Video stabilized (strength: {}, smoothing: {}) and saved to {}",
            params.strength, params.smoothing, params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn detect_scene_changes(&self, params: DetectScenesParams) -> Result<SceneReport> {
        params.validate().map_err(into_error)?;
        let duration = self.probe(&params.input_path).await?.duration;
        let output = self.run(builders::detect_scenes(&params)).await?;

        let cuts = scenes::parse_cut_times(&output.stderr);
        let report = scenes::build_report(&cuts, duration, params.min_scene_length);
        info!(scenes = report.scene_count, cuts = cuts.len(), "Detected scenes");
        Ok(report)
    }

    // =========================================================================
    // Motion effects
    // =========================================================================

    /// Zoom and pan across a still image or a video.
    ///
    /// Without a duration, videos use their probed length and stills are
    /// animated for [`builders::DEFAULT_STILL_DURATION`] seconds.
    #[instrument(level = "info", skip(self))]
    pub async fn create_zoom_pan_effect(&self, params: ZoomPanParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let duration = match params.duration {
            Some(d) => d,
            None if builders::is_image(&params.input_path) => builders::DEFAULT_STILL_DURATION,
            None => self.probe(&params.input_path).await?.duration,
        };
        if duration <= 0.0 {
            return Err(Error::ffmpeg(format!(
                "Could not determine the duration of '{}'",
                params.input_path
            )));
        }
        self.run(builders::zoom_pan(&params, duration)).await?;

        info!(output = %params.output_path, duration, easing = ?params.easing, "Created zoom/pan effect");
        Ok(format!(
            "Zoom/pan effect ({}x to {}x) saved to {}",
            params.start_zoom, params.end_zoom, params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn create_loop_video(&self, params: LoopVideoParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        let has_audio = self.probe(&params.input_path).await?.has_audio();
        self.run(builders::loop_video(&params, has_audio)).await?;

        info!(output = %params.output_path, length = params.loop_duration, seamless = params.seamless, "Created loop");
        Ok(format!(
            "Loop of {}s saved to {}",
            params.loop_duration, params.output_path
        ))
    }

    #[instrument(level = "info", skip(self))]
    pub async fn apply_motion_blur(&self, params: MotionBlurParams) -> Result<String> {
        params.validate().map_err(into_error)?;
        self.run(builders::motion_blur(&params)).await?;

        info!(output = %params.output_path, strength = params.blur_strength, angle = params.angle, "Applied motion blur");
        Ok(format!(
            "Motion blur applied (strength: {}, angle: {} degrees) and saved to {}",
            params.blur_strength, params.angle, params.output_path
        ))
    }
}

/// A uniquely named hidden file in the same directory as `output`.
fn sibling_temp_file(output: &str, tag: &str, extension: &str) -> PathBuf {
    let dir = Path::new(output)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format!(".vfx-{}-{}.{}", tag, Uuid::new_v4(), extension))
}

/// Modification times of the frame files already in `dir`.
async fn frame_snapshot(dir: &Path, format: ImageFormat) -> Result<HashMap<String, SystemTime>> {
    let suffix = format!(".{}", format.extension());
    let mut frames = HashMap::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with("frame_") && name.ends_with(&suffix) {
            let modified = entry.metadata().await?.modified()?;
            frames.insert(name, modified);
        }
    }
    Ok(frames)
}

/// Frames written since `before` was taken; untouched leftovers from an
/// earlier extraction into the same directory are not counted.
async fn count_new_frames(
    dir: &Path,
    format: ImageFormat,
    before: &HashMap<String, SystemTime>,
) -> Result<usize> {
    let after = frame_snapshot(dir, format).await?;
    Ok(after
        .iter()
        .filter(|(name, modified)| before.get(*name) != Some(*modified))
        .count())
}
