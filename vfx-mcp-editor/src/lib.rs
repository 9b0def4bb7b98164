//! VFX MCP Editor Library
//!
//! MCP server for video and audio editing using FFmpeg.
//!
//! Each tool validates its parameters, translates them into an ffmpeg
//! invocation and runs it through a [`engine::MediaEngine`]:
//!
//! - Basic: `trim_video`, `get_video_info`, `resize_video`,
//!   `concatenate_videos`, `extract_audio`, `add_audio`, `apply_filter`,
//!   `change_speed`, `generate_thumbnail`, `convert_format`
//! - Advanced: `create_video_slideshow`, `extract_frames`, `add_text_overlay`,
//!   `create_video_mosaic`, `create_picture_in_picture`, `apply_color_grading`,
//!   `create_time_lapse`, `merge_audio_tracks`, `create_green_screen_effect`,
//!   `create_video_transitions`, `create_split_screen`,
//!   `apply_video_stabilization`, `detect_scene_changes`
//! - Motion effects: `create_zoom_pan_effect`, `create_loop_video`,
//!   `apply_motion_blur`
//!
//! Resources: `videos://list` and `videos://{filename}/metadata`.

pub mod builders;
pub mod command;
pub mod engine;
pub mod graph;
pub mod handler;
pub mod params;
pub mod probe;
pub mod registry;
pub mod resources;
pub mod scenes;
pub mod server;

pub use engine::{FfmpegEngine, MediaEngine};
pub use handler::EditorHandler;
pub use probe::VideoMetadata;
pub use registry::{ToolOutput, ToolRegistry};
pub use server::VfxServer;
