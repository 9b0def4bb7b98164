//! Conversion of ffprobe JSON into [`VideoMetadata`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vfx_mcp_common::error::{Error, Result};

/// Container and primary stream metadata for a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub filename: String,
    /// Container format name as reported by ffprobe.
    pub format: String,
    /// Duration in seconds.
    pub duration: f64,
    /// File size in bytes.
    pub size: u64,
    /// Overall bit rate in bits per second.
    pub bit_rate: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoStream>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioStream>,
}

/// The first video stream of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    pub codec: String,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_format: Option<String>,
}

/// The first audio stream of a file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioStream {
    pub codec: String,
    pub sample_rate: u32,
    pub channels: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<u64>,
}

impl VideoMetadata {
    /// Build metadata from `ffprobe -show_format -show_streams` JSON.
    pub fn from_probe(json: &Value) -> Result<Self> {
        let format = json
            .get("format")
            .ok_or_else(|| Error::ffmpeg("ffprobe output missing 'format' field"))?;
        let streams = json
            .get("streams")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let video = streams
            .iter()
            .find(|s| str_field(s, "codec_type") == Some("video"))
            .map(|s| VideoStream {
                codec: str_field(s, "codec_name").unwrap_or("unknown").to_string(),
                width: u64_field(s, "width").unwrap_or(0) as u32,
                height: u64_field(s, "height").unwrap_or(0) as u32,
                fps: str_field(s, "r_frame_rate").map(parse_frame_rate).unwrap_or(0.0),
                bit_rate: u64_field(s, "bit_rate"),
                aspect_ratio: str_field(s, "display_aspect_ratio").map(str::to_string),
                pixel_format: str_field(s, "pix_fmt").map(str::to_string),
            });

        let audio = streams
            .iter()
            .find(|s| str_field(s, "codec_type") == Some("audio"))
            .map(|s| AudioStream {
                codec: str_field(s, "codec_name").unwrap_or("unknown").to_string(),
                sample_rate: u64_field(s, "sample_rate").unwrap_or(0) as u32,
                channels: u64_field(s, "channels").unwrap_or(0) as u32,
                bit_rate: u64_field(s, "bit_rate"),
            });

        Ok(Self {
            filename: str_field(format, "filename").unwrap_or_default().to_string(),
            format: str_field(format, "format_name").unwrap_or("unknown").to_string(),
            duration: f64_field(format, "duration").unwrap_or(0.0),
            size: u64_field(format, "size").unwrap_or(0),
            bit_rate: u64_field(format, "bit_rate").unwrap_or(0),
            video,
            audio,
        })
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }

    /// Video dimensions, if the file has a video stream.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.video.as_ref().map(|v| (v.width, v.height))
    }
}

/// Parse an ffprobe frame rate such as `30000/1001` or `25`.
///
/// Malformed values and zero denominators yield `0.0`.
pub fn parse_frame_rate(value: &str) -> f64 {
    let value = value.trim();
    let parsed = match value.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(n), Ok(d)) if d != 0.0 => n / d,
            _ => 0.0,
        },
        None => value.parse::<f64>().unwrap_or(0.0),
    };
    if parsed.is_finite() { parsed } else { 0.0 }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

// ffprobe reports most numbers as strings ("48000"), but not all of them.
fn u64_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn f64_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::probe_json;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("30/1"), 30.0);
        assert!((parse_frame_rate("30000/1001") - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("25"), 25.0);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("abc"), 0.0);
        assert_eq!(parse_frame_rate("1/x"), 0.0);
    }

    #[test]
    fn test_metadata_from_probe() {
        let meta = VideoMetadata::from_probe(&probe_json(5.0, 1280, 720, true)).unwrap();

        assert_eq!(meta.duration, 5.0);
        assert_eq!(meta.size, 1_048_576);
        assert_eq!(meta.bit_rate, 800_000);
        assert_eq!(meta.dimensions(), Some((1280, 720)));
        let video = meta.video.as_ref().unwrap();
        assert_eq!(video.codec, "h264");
        assert_eq!(video.fps, 30.0);
        assert_eq!(video.aspect_ratio.as_deref(), Some("16:9"));
        let audio = meta.audio.as_ref().unwrap();
        assert_eq!(audio.sample_rate, 48_000);
        assert_eq!(audio.channels, 2);
    }

    #[test]
    fn test_metadata_without_audio() {
        let meta = VideoMetadata::from_probe(&probe_json(2.0, 320, 240, false)).unwrap();
        assert!(!meta.has_audio());

        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("audio").is_none(), "absent audio is omitted");
        assert_eq!(json["video"]["width"], 320);
    }

    #[test]
    fn test_metadata_audio_only() {
        let probe = json!({
            "format": {"filename": "a.wav", "format_name": "wav", "duration": "1.5"},
            "streams": [{"codec_type": "audio", "codec_name": "pcm_s16le", "sample_rate": "44100", "channels": 1}]
        });
        let meta = VideoMetadata::from_probe(&probe).unwrap();
        assert!(meta.video.is_none());
        assert_eq!(meta.dimensions(), None);
        assert_eq!(meta.audio.unwrap().sample_rate, 44_100);
        assert_eq!(meta.size, 0);
    }

    #[test]
    fn test_metadata_requires_format() {
        let err = VideoMetadata::from_probe(&json!({"streams": []})).unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    proptest! {
        #[test]
        fn frame_rate_fraction(num in 1u32..240_000, den in 1u32..10_000) {
            let parsed = parse_frame_rate(&format!("{}/{}", num, den));
            prop_assert!((parsed - num as f64 / den as f64).abs() < 1e-9);
        }

        #[test]
        fn frame_rate_never_panics(input in ".{0,20}") {
            let parsed = parse_frame_rate(&input);
            prop_assert!(parsed.is_finite());
        }
    }
}
