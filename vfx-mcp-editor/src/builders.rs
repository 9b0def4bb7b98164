//! Translation of validated parameters into ffmpeg commands.
//!
//! Every function here is pure: it receives parameters that already passed
//! `validate()`, plus whatever the handler probed, and returns the command to
//! run. Paths are passed to the engine as given.

use std::path::Path;

use crate::command::{
    FfmpegCommand, FilterChain, FilterGraph, escape_concat_path, escape_filter_value, filter, num,
};
use crate::graph::{
    CANVAS_HEIGHT, CANVAS_WIDTH, Pane, atempo_filters, crossfade_offsets, quad_pane, strip_panes,
};
use crate::params::*;

// =============================================================================
// Filter constants
// =============================================================================

/// Sepia colour matrix, rows r/g/b by input channel r/g/b.
pub const SEPIA_MATRIX: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Red/blue shift applied at the extreme colour temperature.
pub const TEMPERATURE_SHIFT: f64 = 0.2;

/// Temperature magnitude that maps to the full shift.
pub const TEMPERATURE_RANGE: f64 = 2000.0;

/// Green shift applied at the extreme tint.
pub const TINT_SHIFT: f64 = 0.1;

/// Frame rate produced by motion interpolation.
pub const INTERPOLATED_FPS: u32 = 30;

/// Time-lapse factor above which motion interpolation kicks in.
pub const SMOOTH_MOTION_THRESHOLD: f64 = 5.0;

/// Highest time-lapse factor that keeps the audio track.
pub const TIMELAPSE_AUDIO_LIMIT: f64 = 4.0;

/// Smoothing window above which stabilized output is interpolated.
pub const STABILIZE_INTERPOLATE_THRESHOLD: u32 = 50;

/// Sharpening applied after `vidstabtransform`, as recommended by vid.stab.
pub const STABILIZE_UNSHARP: &str = "unsharp=5:5:0.8:3:3:0.4";

/// Frame rate of zoom/pan renders.
pub const ZOOMPAN_FPS: u32 = 30;

/// Seconds a still image is animated when no duration is given.
pub const DEFAULT_STILL_DURATION: f64 = 5.0;

/// Blur length in pixels per unit of strength at a fully open shutter.
pub const MOTION_BLUR_SCALE: f64 = 10.0;

/// Shutter speed below which neighbouring frames are blended as well.
pub const FRAME_BLEND_SHUTTER: f64 = 0.8;

/// Extensions treated as still images when used as a background.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp", "tif", "tiff"];

fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

/// Whether the path names a still image.
pub fn is_image(path: &str) -> bool {
    extension_of(path).is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

// =============================================================================
// Basic operations
// =============================================================================

/// Stream-copy a segment starting at `start_time`.
pub fn trim(params: &TrimVideoParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new()
        .opt("-ss", num(params.start_time))
        .input(&params.input_path);
    if let Some(duration) = params.duration {
        cmd = cmd.opt("-t", num(duration));
    }
    cmd.opt("-c", "copy").output(&params.output_path)
}

pub fn resize(params: &ResizeVideoParams, spec: ResizeSpec) -> FfmpegCommand {
    FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(spec.filter())
        .opt("-c:a", "copy")
        .output(&params.output_path)
}

/// Concat demuxer list for the given absolute paths.
pub fn concat_list<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| {
            format!(
                "file '{}'\n",
                escape_concat_path(&p.as_ref().to_string_lossy())
            )
        })
        .collect()
}

pub fn concatenate(list_path: &Path, output_path: &str) -> FfmpegCommand {
    FfmpegCommand::new()
        .opt("-f", "concat")
        .opt("-safe", "0")
        .input(list_path)
        .opt("-c", "copy")
        .output(output_path)
}

pub fn extract_audio(params: &ExtractAudioParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new().input(&params.input_path).arg("-vn");
    match params.format {
        Some(format) => {
            cmd = cmd.opt("-c:a", format.codec());
            if format.uses_bitrate() {
                cmd = cmd.opt("-b:a", &params.bitrate);
            }
        }
        None => {
            cmd = cmd.opt("-b:a", &params.bitrate);
        }
    }
    cmd.output(&params.output_path)
}

/// Add a soundtrack. Mixing needs an existing audio stream; without one the
/// new track simply replaces the (absent) original.
pub fn add_audio(params: &AddAudioParams, video_has_audio: bool) -> FfmpegCommand {
    let volume = filter("volume", &[("volume", num(params.audio_volume))]);
    let graph = if params.replace || !video_has_audio {
        FilterGraph::new().chain(FilterChain::on("1:a").filter(volume).output("a"))
    } else {
        FilterGraph::new()
            .chain(FilterChain::on("1:a").filter(volume).output("a1"))
            .chain(
                FilterChain::on("0:a")
                    .input("a1")
                    .filter("amix=inputs=2:duration=shortest")
                    .output("a"),
            )
    };

    FfmpegCommand::new()
        .input(&params.video_path)
        .input(&params.audio_path)
        .filter_complex(&graph)
        .map("0:v")
        .map("a")
        .opt("-c:v", "copy")
        .opt("-c:a", "aac")
        .arg("-shortest")
        .output(&params.output_path)
}

/// Sepia matrix blended with the identity by `amount` in [0, 1].
fn sepia(amount: f64) -> String {
    let names = [["rr", "rg", "rb"], ["gr", "gg", "gb"], ["br", "bg", "bb"]];
    let mut options = Vec::with_capacity(9);
    for (row, row_names) in names.iter().enumerate() {
        for (col, name) in row_names.iter().enumerate() {
            let identity = if row == col { 1.0 } else { 0.0 };
            let value = identity + (SEPIA_MATRIX[row][col] - identity) * amount;
            options.push((*name, num(value)));
        }
    }
    filter("colorchannelmixer", &options)
}

/// The video filter for a named effect at the given strength.
pub fn named_filter(kind: VideoFilter, strength: f64) -> String {
    match kind {
        VideoFilter::Blur => filter("boxblur", &[("luma_radius", num(strength))]),
        VideoFilter::Sharpen => format!("unsharp=5:5:{}", num(strength)),
        VideoFilter::Brightness => filter("eq", &[("brightness", num(strength - 1.0))]),
        VideoFilter::Contrast => filter("eq", &[("contrast", num(strength))]),
        VideoFilter::Saturation => filter("eq", &[("saturation", num(strength))]),
        VideoFilter::Vintage => filter("curves", &[("preset", "vintage".to_string())]),
        VideoFilter::Sepia => sepia(strength.min(1.0)),
        VideoFilter::Grayscale => filter("hue", &[("s", num((1.0 - strength).max(0.0)))]),
        VideoFilter::Hflip => "hflip".to_string(),
        VideoFilter::Vflip => "vflip".to_string(),
    }
}

pub fn apply_filter(params: &ApplyFilterParams) -> FfmpegCommand {
    FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(named_filter(params.filter, params.strength))
        .h264_aac()
        .output(&params.output_path)
}

pub fn change_speed(params: &ChangeSpeedParams, has_audio: bool) -> FfmpegCommand {
    let cmd = FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(format!("setpts=PTS/{}", num(params.speed)));
    let cmd = if has_audio {
        cmd.audio_filter(atempo_filters(params.speed))
    } else {
        cmd.arg("-an")
    };
    cmd.output(&params.output_path)
}

pub fn thumbnail(params: &GenerateThumbnailParams, timestamp: f64) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new()
        .opt("-ss", num(timestamp))
        .input(&params.video_path)
        .opt("-frames:v", 1);
    if let Some(scale) = params.scale_filter() {
        cmd = cmd.video_filter(scale);
    }
    cmd.output(&params.output_path)
}

pub fn convert_format(params: &ConvertFormatParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new().input(&params.input_path);
    let options = [
        ("-f", &params.format),
        ("-c:v", &params.video_codec),
        ("-c:a", &params.audio_codec),
        ("-b:v", &params.video_bitrate),
        ("-b:a", &params.audio_bitrate),
    ];
    for (flag, value) in options {
        if let Some(value) = value {
            cmd = cmd.opt(flag, value);
        }
    }
    cmd.output(&params.output_path)
}

// =============================================================================
// Advanced operations
// =============================================================================

/// Every image is fitted onto one canvas so `xfade` and `concat` see equal
/// frame sizes; without a resolution the canvas is 1920x1080.
pub fn slideshow(params: &CreateSlideshowParams, spec: SlideshowSpec) -> FfmpegCommand {
    let count = params.image_paths.len();
    let (w, h) = spec.resolution.unwrap_or((CANVAS_WIDTH, CANVAS_HEIGHT));
    let mut cmd = FfmpegCommand::new();
    for path in &params.image_paths {
        cmd = cmd
            .opt("-loop", 1)
            .opt("-t", num(params.duration_per_image))
            .input(path);
    }

    let mut graph = FilterGraph::new();
    for i in 0..count {
        graph.push(
            FilterChain::on(format!("{}:v", i))
                .filter(format!("scale={w}:{h}:force_original_aspect_ratio=decrease"))
                .filter(format!("pad={w}:{h}:(ow-iw)/2:(oh-ih)/2"))
                .filter("setsar=1")
                .filter(format!("fps={}", params.fps))
                .filter("format=yuv420p")
                .output(format!("s{}", i)),
        );
    }

    let last = if count == 1 {
        "s0".to_string()
    } else if params.transition_duration > 0.0 {
        let durations = vec![params.duration_per_image; count];
        let offsets = crossfade_offsets(&durations, params.transition_duration);
        let mut previous = "s0".to_string();
        for (k, offset) in offsets.iter().enumerate() {
            let label = format!("x{}", k + 1);
            graph.push(
                FilterChain::on(previous)
                    .input(format!("s{}", k + 1))
                    .filter(filter(
                        "xfade",
                        &[
                            ("transition", "fade".to_string()),
                            ("duration", num(params.transition_duration)),
                            ("offset", num(*offset)),
                        ],
                    ))
                    .output(&label),
            );
            previous = label;
        }
        previous
    } else {
        let mut chain = FilterChain::new();
        for i in 0..count {
            chain = chain.input(format!("s{}", i));
        }
        graph.push(chain.filter(format!("concat=n={}:v=1:a=0", count)).output("joined"));
        "joined".to_string()
    };

    cmd.filter_complex(&graph)
        .map(&last)
        .opt("-c:v", "libx264")
        .opt("-pix_fmt", "yuv420p")
        .opt("-r", params.fps)
        .output(&params.output_path)
}

/// File name pattern of extracted frames.
pub fn frame_pattern(format: ImageFormat) -> String {
    format!("frame_%04d.{}", format.extension())
}

pub fn extract_frames(params: &ExtractFramesParams, output_dir: &Path) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new()
        .opt("-ss", num(params.start_time))
        .input(&params.input_path);
    if let Some(end) = params.end_time {
        cmd = cmd.opt("-t", num(end - params.start_time));
    }
    if params.frame_interval > 1 {
        cmd = cmd
            .video_filter(format!("select=not(mod(n\\,{}))", params.frame_interval))
            .opt("-vsync", "vfr");
    }
    cmd.output(output_dir.join(frame_pattern(params.image_format)))
}

/// drawtext x/y expressions for a position; margins scale with the text height.
fn text_coordinates(position: &Position) -> (String, String) {
    let (x, y) = match position {
        Position::Custom { x, y } => return (x.clone(), y.clone()),
        Position::Anchor(Anchor::Center) => ("(w-text_w)/2", "(h-text_h)/2"),
        Position::Anchor(Anchor::Top) => ("(w-text_w)/2", "text_h"),
        Position::Anchor(Anchor::Bottom) => ("(w-text_w)/2", "h-2*text_h"),
        Position::Anchor(Anchor::TopLeft) => ("text_h", "text_h"),
        Position::Anchor(Anchor::TopRight) => ("w-text_w-text_h", "text_h"),
        Position::Anchor(Anchor::BottomLeft) => ("text_h", "h-2*text_h"),
        Position::Anchor(Anchor::BottomRight) => ("w-text_w-text_h", "h-2*text_h"),
    };
    (x.to_string(), y.to_string())
}

/// The `enable` expression for a timed overlay, if the overlay is timed.
pub fn enable_expression(start: f64, duration: Option<f64>) -> Option<String> {
    match duration {
        Some(d) => Some(format!("between(t,{},{})", num(start), num(start + d))),
        None if start > 0.0 => Some(format!("gte(t,{})", num(start))),
        None => None,
    }
}

pub fn text_overlay(params: &AddTextOverlayParams, spec: &TextOverlaySpec) -> FfmpegCommand {
    let (x, y) = text_coordinates(&spec.position);
    let mut options = vec![
        ("text", escape_filter_value(&params.text)),
        ("expansion", "none".to_string()),
        ("fontsize", params.font_size.to_string()),
        ("fontcolor", spec.font_color.clone()),
        ("x", escape_filter_value(&x)),
        ("y", escape_filter_value(&y)),
    ];
    if let Some(background) = &spec.background_color {
        options.push(("box", "1".to_string()));
        options.push(("boxcolor", background.clone()));
        options.push(("boxborderw", "5".to_string()));
    }
    if let Some(enable) = enable_expression(params.start_time, params.duration) {
        options.push(("enable", escape_filter_value(&enable)));
    }

    FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(filter("drawtext", &options))
        .h264_aac()
        .output(&params.output_path)
}

pub fn mosaic(params: &CreateMosaicParams, spec: MosaicSpec) -> FfmpegCommand {
    let cells = spec.grid.cells();
    let (cell_w, cell_h) = spec.grid.cell_size();

    let mut cmd = FfmpegCommand::new();
    for path in params.input_paths.iter().take(cells) {
        cmd = cmd.input(path);
    }

    let mut graph = FilterGraph::new();
    let scale = format!("scale={}:{}", cell_w, cell_h);
    if cells == 1 {
        graph.push(FilterChain::on("0:v").filter(scale).filter("setsar=1").output("v"));
    } else {
        let mut stack = FilterChain::new();
        for i in 0..cells {
            graph.push(
                FilterChain::on(format!("{}:v", i))
                    .filter(scale.as_str())
                    .filter("setsar=1")
                    .output(format!("c{}", i)),
            );
            stack = stack.input(format!("c{}", i));
        }
        graph.push(
            stack
                .filter(filter(
                    "xstack",
                    &[
                        ("inputs", cells.to_string()),
                        ("layout", spec.grid.xstack_layout()),
                    ],
                ))
                .output("v"),
        );
    }

    cmd = cmd.filter_complex(&graph).map("v");
    cmd = match spec.audio_source {
        Some(index) => cmd.map(&format!("{}:a?", index)),
        None => cmd.arg("-an"),
    };
    cmd.h264_aac().output(&params.output_path)
}

/// Pixel offset of an overlay of size `inset` on a frame of size `frame`.
pub fn overlay_offset(
    position: &Position,
    frame: (u32, u32),
    inset: (u32, u32),
    margin: u32,
) -> (String, String) {
    let (fw, fh) = (i64::from(frame.0), i64::from(frame.1));
    let (iw, ih) = (i64::from(inset.0), i64::from(inset.1));
    let m = i64::from(margin);
    let (x, y) = match position {
        Position::Custom { x, y } => return (x.clone(), y.clone()),
        Position::Anchor(Anchor::TopLeft) => (m, m),
        Position::Anchor(Anchor::TopRight) => (fw - iw - m, m),
        Position::Anchor(Anchor::BottomLeft) => (m, fh - ih - m),
        Position::Anchor(Anchor::BottomRight) => (fw - iw - m, fh - ih - m),
        Position::Anchor(Anchor::Center) => ((fw - iw) / 2, (fh - ih) / 2),
        Position::Anchor(Anchor::Top) => ((fw - iw) / 2, m),
        Position::Anchor(Anchor::Bottom) => ((fw - iw) / 2, fh - ih - m),
    };
    (x.max(0).to_string(), y.max(0).to_string())
}

/// Round a frame size down to even sides, as yuv420p requires.
pub fn even_size((width, height): (u32, u32)) -> (u32, u32) {
    ((width & !1).max(2), (height & !1).max(2))
}

/// Inset size: the main frame scaled and floored.
pub fn inset_size(main: (u32, u32), scale: f64) -> (u32, u32) {
    (
        ((f64::from(main.0) * scale).floor() as u32).max(1),
        ((f64::from(main.1) * scale).floor() as u32).max(1),
    )
}

pub fn picture_in_picture(
    params: &PictureInPictureParams,
    position: &Position,
    main: (u32, u32),
) -> FfmpegCommand {
    let (iw, ih) = inset_size(main, params.scale);
    let (x, y) = overlay_offset(position, main, (iw, ih), params.margin);

    let mut inset = FilterChain::on("1:v").filter(format!("scale={}:{}", iw, ih));
    if params.opacity < 1.0 {
        inset = inset
            .filter("format=yuva420p")
            .filter(filter("colorchannelmixer", &[("aa", num(params.opacity))]));
    }
    let graph = FilterGraph::new()
        .chain(inset.output("pip"))
        .chain(
            FilterChain::on("0:v")
                .input("pip")
                .filter(filter(
                    "overlay",
                    &[("x", escape_filter_value(&x)), ("y", escape_filter_value(&y))],
                ))
                .output("v"),
        );

    FfmpegCommand::new()
        .input(&params.main_video_path)
        .input(&params.overlay_video_path)
        .filter_complex(&graph)
        .map("v")
        .map("0:a?")
        .h264_aac()
        .output(&params.output_path)
}

/// The grading filter chain; `None` when every value is neutral.
pub fn grading_filters(params: &ColorGradingParams) -> Option<String> {
    let mut filters = Vec::new();
    let tonal_neutral = params.brightness == 0.0
        && params.contrast == 1.0
        && params.saturation == 1.0
        && params.gamma == 1.0;
    if !tonal_neutral {
        filters.push(filter(
            "eq",
            &[
                ("brightness", num(params.brightness)),
                ("contrast", num(params.contrast)),
                ("saturation", num(params.saturation)),
                ("gamma", num(params.gamma)),
            ],
        ));
    }
    if params.temperature != 0.0 || params.tint != 0.0 {
        let warm = params.temperature / TEMPERATURE_RANGE * TEMPERATURE_SHIFT;
        filters.push(filter(
            "colorbalance",
            &[
                ("rs", num(warm)),
                ("gs", num(params.tint / 100.0 * TINT_SHIFT)),
                ("bs", num(-warm)),
            ],
        ));
    }
    (!filters.is_empty()).then(|| filters.join(","))
}

pub fn color_grading(params: &ColorGradingParams) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new().input(&params.input_path);
    if let Some(chain) = grading_filters(params) {
        cmd = cmd.video_filter(chain);
    }
    cmd.h264_aac().output(&params.output_path)
}

/// Whole-frame sampling step for a time-lapse factor.
pub fn timelapse_step(speed_factor: f64) -> u32 {
    speed_factor.floor().max(1.0) as u32
}

pub fn time_lapse(params: &TimeLapseParams, has_audio: bool) -> FfmpegCommand {
    let step = timelapse_step(params.speed_factor);
    let mut filters = Vec::new();
    if params.stabilize {
        filters.push("deshake".to_string());
    }
    filters.push(format!("select=not(mod(n\\,{}))", step));
    filters.push("setpts=N/FRAME_RATE/TB".to_string());
    if params.smooth_motion && params.speed_factor > SMOOTH_MOTION_THRESHOLD {
        filters.push(format!("minterpolate=fps={}", INTERPOLATED_FPS));
    }

    let cmd = FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(filters.join(","));
    let cmd = if has_audio && params.speed_factor <= TIMELAPSE_AUDIO_LIMIT {
        cmd.audio_filter(atempo_filters(f64::from(step)))
            .opt("-c:a", "aac")
    } else {
        cmd.arg("-an")
    };
    cmd.opt("-c:v", "libx264")
        .opt("-pix_fmt", "yuv420p")
        .output(&params.output_path)
}

/// Audio encoder implied by an output file name.
pub fn audio_codec_for(output_path: &str) -> &'static str {
    let format = match extension_of(output_path).as_deref() {
        Some("mp3") => AudioFormat::Mp3,
        Some("wav") => AudioFormat::Wav,
        Some("flac") => AudioFormat::Flac,
        Some("ogg") | Some("oga") => AudioFormat::Ogg,
        _ => AudioFormat::Aac,
    };
    format.codec()
}

pub fn merge_audio(params: &MergeAudioParams, tracks: &[TrackSpec]) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    for path in &params.audio_paths {
        cmd = cmd.input(path);
    }

    let mut graph = FilterGraph::new();
    for (i, track) in tracks.iter().enumerate() {
        let mut chain = FilterChain::on(format!("{}:a", i));
        if track.delay > 0.0 {
            let ms = (track.delay * 1000.0).round() as u64;
            chain = chain.filter(format!("adelay={ms}|{ms}"));
        }
        graph.push(
            chain
                .filter(filter("volume", &[("volume", num(track.volume))]))
                .output(format!("t{}", i)),
        );
    }

    let count = tracks.len();
    match params.mix_mode {
        MixMode::Mix | MixMode::Sequence => {
            let mut chain = FilterChain::new();
            for i in 0..count {
                chain = chain.input(format!("t{}", i));
            }
            let combine = match params.mix_mode {
                MixMode::Sequence => format!("concat=n={}:v=0:a=1", count),
                _ => format!("amix=inputs={}:duration=longest", count),
            };
            graph.push(chain.filter(combine).output("out"));
        }
        MixMode::Overlay => {
            let mut previous = "t0".to_string();
            for i in 1..count {
                let label = if i + 1 == count {
                    "out".to_string()
                } else {
                    format!("m{}", i)
                };
                graph.push(
                    FilterChain::on(previous)
                        .input(format!("t{}", i))
                        .filter("amix=inputs=2:duration=first")
                        .output(&label),
                );
                previous = label;
            }
        }
    }

    cmd.filter_complex(&graph)
        .map("out")
        .opt("-c:a", audio_codec_for(&params.output_path))
        .output(&params.output_path)
}

/// chromakey (plus despill where it applies) for a validated key.
pub fn chroma_key_filters(spec: &ChromaKeySpec) -> Vec<String> {
    let mut filters = vec![filter(
        "chromakey",
        &[
            ("color", spec.color.clone()),
            ("similarity", num(spec.similarity)),
            ("blend", num(spec.blend)),
        ],
    )];
    if let Some(kind) = spec.despill {
        if spec.spill > 0.0 {
            filters.push(filter(
                "despill",
                &[("type", kind.as_str().to_string()), ("mix", num(spec.spill))],
            ));
        }
    }
    filters
}

/// An encoder that keeps the alpha channel produced by keying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaCodec {
    pub video: &'static str,
    pub pix_fmt: &'static str,
    pub audio: &'static str,
}

impl AlphaCodec {
    fn apply(&self, cmd: FfmpegCommand) -> FfmpegCommand {
        let cmd = cmd
            .opt("-c:v", self.video)
            .opt("-pix_fmt", self.pix_fmt)
            .opt("-c:a", self.audio);
        if self.video == "prores_ks" {
            cmd.opt("-profile:v", "4444")
        } else {
            cmd
        }
    }
}

/// Alpha-capable encoder implied by an output file name.
///
/// `.mov` gets ProRes 4444 and `.webm` gets VP9 with alpha. Other containers
/// fall back to H.264, where keyed pixels come out black.
pub fn alpha_codec_for(output_path: &str) -> Option<AlphaCodec> {
    match extension_of(output_path).as_deref() {
        Some("mov") => Some(AlphaCodec {
            video: "prores_ks",
            pix_fmt: "yuva444p10le",
            audio: "aac",
        }),
        Some("webm") => Some(AlphaCodec {
            video: "libvpx-vp9",
            pix_fmt: "yuva420p",
            audio: "libopus",
        }),
        _ => None,
    }
}

pub fn green_screen(
    params: &GreenScreenParams,
    spec: &ChromaKeySpec,
    foreground: Option<(u32, u32)>,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new().input(&params.input_path);
    let Some(background) = &params.background_path else {
        let cmd = cmd.video_filter(chroma_key_filters(spec).join(","));
        let cmd = match alpha_codec_for(&params.output_path) {
            Some(codec) => codec.apply(cmd),
            None => cmd.h264_aac(),
        };
        return cmd.output(&params.output_path);
    };

    if is_image(background) {
        cmd = cmd.opt("-loop", 1);
    }
    cmd = cmd.input(background);

    let mut bg = FilterChain::on("1:v");
    if let Some((w, h)) = foreground {
        bg = bg.filter(format!("scale={}:{}", w, h));
    }
    let mut fg = FilterChain::on("0:v");
    for f in chroma_key_filters(spec) {
        fg = fg.filter(f);
    }
    let graph = FilterGraph::new()
        .chain(bg.output("bg"))
        .chain(fg.output("fg"))
        .chain(
            FilterChain::on("bg")
                .input("fg")
                .filter("overlay=shortest=1")
                .output("v"),
        );

    cmd.filter_complex(&graph)
        .map("v")
        .map("0:a?")
        .h264_aac()
        .output(&params.output_path)
}

/// Clip properties the transition graph normalises to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipFormat {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

pub fn transitions(
    params: &TransitionsParams,
    durations: &[f64],
    format: ClipFormat,
) -> FfmpegCommand {
    let mut cmd = FfmpegCommand::new();
    for path in &params.video_paths {
        cmd = cmd.input(path);
    }

    let fps = if format.fps > 0.0 { format.fps } else { f64::from(INTERPOLATED_FPS) };
    let mut graph = FilterGraph::new();
    for i in 0..params.video_paths.len() {
        graph.push(
            FilterChain::on(format!("{}:v", i))
                .filter(format!("scale={}:{}", format.width, format.height))
                .filter("setsar=1")
                .filter(format!("fps={}", num(fps)))
                .filter("format=yuv420p")
                .filter("settb=AVTB")
                .output(format!("s{}", i)),
        );
    }

    let offsets = crossfade_offsets(durations, params.transition_duration);
    let mut previous = "s0".to_string();
    for (k, offset) in offsets.iter().enumerate() {
        let label = if k + 1 == offsets.len() {
            "v".to_string()
        } else {
            format!("x{}", k + 1)
        };
        graph.push(
            FilterChain::on(previous)
                .input(format!("s{}", k + 1))
                .filter(filter(
                    "xfade",
                    &[
                        ("transition", params.transition_type.xfade_name().to_string()),
                        ("duration", num(params.transition_duration)),
                        ("offset", num(*offset)),
                    ],
                ))
                .output(&label),
        );
        previous = label;
    }

    cmd.filter_complex(&graph)
        .map("v")
        .arg("-an")
        .opt("-c:v", "libx264")
        .opt("-pix_fmt", "yuv420p")
        .output(&params.output_path)
}

/// Builds split-screen graphs, numbering border sources as it goes.
struct SplitGraph {
    graph: FilterGraph,
    color: String,
    border: u32,
    borders: usize,
}

impl SplitGraph {
    fn pane(&mut self, input: usize, pane: Pane) -> String {
        let label = format!("p{}", input);
        self.graph.push(
            FilterChain::on(format!("{}:v", input))
                .filter(format!("scale={}:{}", pane.width, pane.height))
                .filter("setsar=1")
                .filter("format=yuv420p")
                .output(&label),
        );
        label
    }

    fn border_source(&mut self, width: u32, height: u32) -> String {
        let label = format!("b{}", self.borders);
        self.borders += 1;
        self.graph.push(
            FilterChain::new()
                .filter(format!("color=c={}:s={}x{}", self.color, width, height))
                .filter("format=yuv420p")
                .output(&label),
        );
        label
    }

    /// First video above the top-right to bottom-left diagonal, second below.
    ///
    /// The mask is derived from the first video so it ends with the inputs;
    /// `geq` sees per-plane sizes, so one expression serves luma and chroma.
    fn diagonal(&mut self) -> String {
        let full = Pane {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        };
        let first = self.pane(0, full);
        let second = self.pane(1, full);
        let below = escape_filter_value("if(gt(X*H+Y*W,W*H),255,0)");
        self.graph.push(
            FilterChain::on(first)
                .filter("split")
                .output("base")
                .output("m0"),
        );
        self.graph.push(
            FilterChain::on("m0")
                .filter(filter(
                    "geq",
                    &[
                        ("lum", below.clone()),
                        ("cb", below.clone()),
                        ("cr", below),
                    ],
                ))
                .output("mask"),
        );
        self.graph.push(
            FilterChain::on("base")
                .input(second)
                .input("mask")
                .filter("maskedmerge")
                .output("st"),
        );
        "st".to_string()
    }

    /// Stack `items` with a border between neighbours.
    fn stack(&mut self, items: Vec<String>, pane: Pane, side_by_side: bool, out: &str) -> String {
        let mut inputs = Vec::with_capacity(items.len() * 2);
        let count = items.len();
        for (i, item) in items.into_iter().enumerate() {
            inputs.push(item);
            if self.border > 0 && i + 1 < count {
                let border = if side_by_side {
                    self.border_source(self.border, pane.height)
                } else {
                    self.border_source(pane.width, self.border)
                };
                inputs.push(border);
            }
        }
        let name = if side_by_side { "hstack" } else { "vstack" };
        let mut chain = FilterChain::new();
        let n = inputs.len();
        for input in inputs {
            chain = chain.input(input);
        }
        self.graph.push(
            chain
                .filter(format!("{}=inputs={}:shortest=1", name, n))
                .output(out),
        );
        out.to_string()
    }
}

pub fn split_screen(params: &SplitScreenParams, border_color: &str) -> FfmpegCommand {
    let border = params.border_width;
    let mut split = SplitGraph {
        graph: FilterGraph::new(),
        color: border_color.to_string(),
        border,
        borders: 0,
    };

    let stacked = match params.layout {
        SplitLayout::Diagonal => split.diagonal(),
        SplitLayout::Quad => {
            let pane = quad_pane(border);
            let panes: Vec<String> = (0..4).map(|i| split.pane(i, pane)).collect();
            let top = split.stack(panes[0..2].to_vec(), pane, true, "r0");
            let bottom = split.stack(panes[2..4].to_vec(), pane, true, "r1");
            let row = Pane {
                width: pane.width * 2 + border,
                height: pane.height,
            };
            split.stack(vec![top, bottom], row, false, "st")
        }
        layout => {
            let side_by_side = matches!(
                layout,
                SplitLayout::Vertical | SplitLayout::TripleHorizontal
            );
            let count = layout.required_inputs();
            let pane = strip_panes(count as u32, border, side_by_side);
            let panes: Vec<String> = (0..count).map(|i| split.pane(i, pane)).collect();
            split.stack(panes, pane, side_by_side, "st")
        }
    };

    // integer division can leave the stack a few pixels short of the canvas
    split.graph.push(
        FilterChain::on(stacked)
            .filter(format!(
                "pad={}:{}:0:0:color={}",
                CANVAS_WIDTH, CANVAS_HEIGHT, border_color
            ))
            .filter("format=yuv420p")
            .output("v"),
    );

    let mut cmd = FfmpegCommand::new();
    for path in &params.video_paths {
        cmd = cmd.input(path);
    }
    cmd.filter_complex(&split.graph)
        .map("v")
        .map("0:a?")
        .h264_aac()
        .output(&params.output_path)
}

/// Pass one: motion analysis into the transforms file.
pub fn stabilize_detect(params: &StabilizationParams, transforms: &Path) -> FfmpegCommand {
    let result = escape_filter_value(&transforms.to_string_lossy());
    FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(filter(
            "vidstabdetect",
            &[
                ("shakiness", params.strength.to_string()),
                ("accuracy", "15".to_string()),
                ("result", result),
            ],
        ))
        .opt("-f", "null")
        .arg("-")
}

/// Pass two: apply the transforms and re-encode.
pub fn stabilize_transform(params: &StabilizationParams, transforms: &Path) -> FfmpegCommand {
    let input = escape_filter_value(&transforms.to_string_lossy());
    let zoom = (params.zoom * 100.0).round() as u32;
    let mut filters = vec![
        filter(
            "vidstabtransform",
            &[
                ("input", input),
                ("smoothing", params.smoothing.to_string()),
                ("crop", if params.crop_black { "black" } else { "keep" }.to_string()),
                ("zoom", zoom.to_string()),
                ("optzoom", if zoom > 0 { "1" } else { "0" }.to_string()),
            ],
        ),
        STABILIZE_UNSHARP.to_string(),
    ];
    if params.smoothing > STABILIZE_INTERPOLATE_THRESHOLD {
        filters.push(format!("minterpolate=fps={}:mi_mode=mci", INTERPOLATED_FPS));
    }
    FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(filters.join(","))
        .h264_aac()
        .output(&params.output_path)
}

pub fn detect_scenes(params: &DetectScenesParams) -> FfmpegCommand {
    FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(format!(
            "select=gt(scene\\,{}),showinfo",
            num(params.threshold)
        ))
        .arg("-an")
        .opt("-f", "null")
        .arg("-")
}

// =============================================================================
// Motion effects
// =============================================================================

/// Number of frames a zoom/pan move spans.
pub fn zoom_pan_frames(duration: f64) -> u64 {
    (duration * f64::from(ZOOMPAN_FPS)).round().max(1.0) as u64
}

/// `zoompan` over `duration` seconds.
///
/// A still image is held for every frame of the move; a video is resampled
/// to the render rate and each of its frames is zoomed once. `on` counts
/// output frames in both cases, so the eased progress runs from 0 to 1.
pub fn zoom_pan(params: &ZoomPanParams, duration: f64) -> FfmpegCommand {
    let frames = zoom_pan_frames(duration);
    let progress = format!("min(on/{},1)", frames.saturating_sub(1).max(1));
    let eased = format!("({})", params.easing.apply(&progress));
    let tween = |from: f64, to: f64| format!("{}+{}*{}", num(from), num(to - from), eased);

    let zoom = tween(params.start_zoom, params.end_zoom);
    let x = format!("iw*({})-iw/zoom/2", tween(params.start_x, params.end_x));
    let y = format!("ih*({})-ih/zoom/2", tween(params.start_y, params.end_y));

    let still = is_image(&params.input_path);
    let zoompan = filter(
        "zoompan",
        &[
            ("z", escape_filter_value(&zoom)),
            ("x", escape_filter_value(&x)),
            ("y", escape_filter_value(&y)),
            ("d", (if still { frames } else { 1 }).to_string()),
            ("s", format!("{}x{}", CANVAS_WIDTH, CANVAS_HEIGHT)),
            ("fps", ZOOMPAN_FPS.to_string()),
        ],
    );
    let chain = if still {
        zoompan
    } else {
        format!("fps={},{}", ZOOMPAN_FPS, zoompan)
    };

    FfmpegCommand::new()
        .input(&params.input_path)
        .video_filter(chain)
        .opt("-t", num(duration))
        .h264_aac()
        .output(&params.output_path)
}

/// Repeat the input to `loop_duration` seconds.
///
/// Seamless loops start `crossfade_duration` into the source and dissolve
/// back into its first seconds at the end, so the last frame leads straight
/// into the first.
pub fn loop_video(params: &LoopVideoParams, has_audio: bool) -> FfmpegCommand {
    let cmd = FfmpegCommand::new()
        .opt("-stream_loop", -1)
        .input(&params.input_path);
    let length = params.loop_duration;
    if !params.seamless {
        return cmd
            .opt("-t", num(length))
            .h264_aac()
            .output(&params.output_path);
    }

    let fade = params.crossfade_duration;
    let body = format!("trim=start={}:end={}", num(fade), num(length + fade));
    let head = format!("trim=start=0:end={}", num(fade));
    let mut graph = FilterGraph::new()
        .chain(FilterChain::on("0:v").filter("split").output("vb").output("vh"))
        .chain(FilterChain::on("vb").filter(&body).filter("setpts=PTS-STARTPTS").output("body"))
        .chain(FilterChain::on("vh").filter(&head).filter("setpts=PTS-STARTPTS").output("head"))
        .chain(
            FilterChain::on("body")
                .input("head")
                .filter(filter(
                    "xfade",
                    &[
                        ("transition", "fade".to_string()),
                        ("duration", num(fade)),
                        ("offset", num(length - fade)),
                    ],
                ))
                .output("v"),
        );
    if has_audio {
        graph.push(FilterChain::on("0:a").filter("asplit").output("ab").output("ah"));
        graph.push(
            FilterChain::on("ab")
                .filter(format!("a{}", body))
                .filter("asetpts=PTS-STARTPTS")
                .output("abody"),
        );
        graph.push(
            FilterChain::on("ah")
                .filter(format!("a{}", head))
                .filter("asetpts=PTS-STARTPTS")
                .output("ahead"),
        );
        graph.push(
            FilterChain::on("abody")
                .input("ahead")
                .filter(format!("acrossfade=d={}", num(fade)))
                .output("a"),
        );
    }

    let cmd = cmd.filter_complex(&graph).map("v");
    let cmd = if has_audio { cmd.map("a") } else { cmd };
    cmd.opt("-t", num(length))
        .h264_aac()
        .output(&params.output_path)
}

/// `avgblur` kernel (width, height) smeared along `angle` degrees.
pub fn motion_blur_kernel(strength: f64, angle: f64, shutter_speed: f64) -> (u32, u32) {
    let length = (strength * (1.0 - shutter_speed) * MOTION_BLUR_SCALE)
        .round()
        .max(1.0);
    let radians = angle.to_radians();
    (
        (length * radians.cos().abs()).round().max(1.0) as u32,
        (length * radians.sin().abs()).round().max(1.0) as u32,
    )
}

pub fn motion_blur(params: &MotionBlurParams) -> FfmpegCommand {
    let mut filters = Vec::new();
    let (kx, ky) = motion_blur_kernel(params.blur_strength, params.angle, params.shutter_speed);
    if (kx, ky) != (1, 1) {
        filters.push(format!("avgblur=sizeX={}:sizeY={}", kx, ky));
    }
    if params.shutter_speed < FRAME_BLEND_SHUTTER {
        let frames = (((1.0 - params.shutter_speed) * 5.0).floor() as u32).max(2);
        filters.push(format!(
            "tmix=frames={}:weights=1 {}",
            frames,
            num(params.shutter_speed)
        ));
    }
    let cmd = FfmpegCommand::new().input(&params.input_path);
    let cmd = if filters.is_empty() {
        cmd
    } else {
        cmd.video_filter(filters.join(","))
    };
    cmd.opt("-c:v", "libx264")
        .opt("-pix_fmt", "yuv420p")
        .opt("-c:a", "copy")
        .output(&params.output_path)
}
