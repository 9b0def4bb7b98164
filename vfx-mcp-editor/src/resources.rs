//! MCP resources for the editor.
//!
//! - `videos://list` - video files in the media directory
//! - `videos://{filename}/metadata` - probed metadata for one file

use std::path::Path;

use serde_json::{Value, json};
use vfx_mcp_common::error::Result;

use crate::handler::EditorHandler;

/// URI of the directory listing.
pub const LIST_URI: &str = "videos://list";

const SCHEME: &str = "videos://";
const METADATA_SUFFIX: &str = "/metadata";

/// Extensions (lower-case) listed as videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "flv", "wmv"];

/// A parsed `videos://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoResource {
    List,
    Metadata(String),
}

impl VideoResource {
    pub fn parse(uri: &str) -> Option<Self> {
        if uri == LIST_URI {
            return Some(VideoResource::List);
        }
        let name = uri.strip_prefix(SCHEME)?.strip_suffix(METADATA_SUFFIX)?;
        (!name.is_empty()).then(|| VideoResource::Metadata(name.to_string()))
    }
}

/// Metadata URI for a file name.
pub fn metadata_uri(name: &str) -> String {
    format!("{}{}{}", SCHEME, name, METADATA_SUFFIX)
}

pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

/// Sorted names of the video files directly inside `dir`.
pub async fn list_videos(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_video_file(&path) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Body of `videos://list`.
pub async fn list_resource_json(dir: &Path) -> Result<String> {
    let videos = list_videos(dir).await?;
    Ok(pretty(&json!({ "videos": videos })))
}

/// Body of `videos://{name}/metadata`. Probe failures are reported in the
/// body rather than as a protocol error.
pub async fn metadata_resource_json(handler: &EditorHandler, name: &str) -> String {
    let path = handler.config().media_path(name);
    match handler.probe(&path).await {
        Ok(metadata) => serde_json::to_value(&metadata)
            .map(|v| pretty(&v))
            .unwrap_or_else(|e| pretty(&json!({ "error": e.to_string() }))),
        Err(e) => pretty(&json!({ "error": e.to_string() })),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{RecordingEngine, probe_json};
    use std::sync::Arc;
    use vfx_mcp_common::config::Config;

    #[test]
    fn test_parse_uris() {
        assert_eq!(VideoResource::parse("videos://list"), Some(VideoResource::List));
        assert_eq!(
            VideoResource::parse("videos://clip one.mp4/metadata"),
            Some(VideoResource::Metadata("clip one.mp4".to_string()))
        );
        assert_eq!(
            VideoResource::parse(&metadata_uri("a.mkv")),
            Some(VideoResource::Metadata("a.mkv".to_string()))
        );
        assert_eq!(VideoResource::parse("videos:///metadata"), None);
        assert_eq!(VideoResource::parse("image://models"), None);
        assert_eq!(VideoResource::parse("videos://a.mp4"), None);
    }

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(Path::new("a.mp4")));
        assert!(is_video_file(Path::new("B.MOV")));
        assert!(is_video_file(Path::new("dir/c.webm")));
        assert!(!is_video_file(Path::new("notes.txt")));
        assert!(!is_video_file(Path::new("mp4")));
    }

    #[tokio::test]
    async fn test_list_videos_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["zeta.mkv", "alpha.MP4", "song.mp3", "readme.md"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();

        let videos = list_videos(dir.path()).await.unwrap();
        assert_eq!(videos, vec!["alpha.MP4", "zeta.mkv"]);

        let body: Value = serde_json::from_str(&list_resource_json(dir.path()).await.unwrap()).unwrap();
        assert_eq!(body, json!({ "videos": ["alpha.MP4", "zeta.mkv"] }));
    }

    #[tokio::test]
    async fn test_list_videos_missing_dir() {
        let err = list_videos(Path::new("/nonexistent/media/dir")).await.unwrap_err();
        assert!(matches!(err, vfx_mcp_common::Error::Io(_)));
    }

    #[tokio::test]
    async fn test_metadata_resource() {
        let engine = Arc::new(RecordingEngine::with_probe(probe_json(12.5, 1920, 1080, true)));
        let handler = EditorHandler::with_engine(Config::default(), engine);
        let body: Value =
            serde_json::from_str(&metadata_resource_json(&handler, "clip.mp4").await).unwrap();
        assert_eq!(body["duration"], 12.5);
        assert_eq!(body["audio"]["channels"], 2);

        let broken = Arc::new(RecordingEngine::with_probe(json!({})));
        let handler = EditorHandler::with_engine(Config::default(), broken);
        let body: Value =
            serde_json::from_str(&metadata_resource_json(&handler, "clip.mp4").await).unwrap();
        assert!(body["error"].as_str().unwrap().contains("format"));
    }
}
