//! A media engine that never spawns processes.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use vfx_mcp_common::{Config, Result};
use vfx_mcp_editor::command::FfmpegCommand;
use vfx_mcp_editor::engine::{EngineOutput, MediaEngine};
use vfx_mcp_editor::{EditorHandler, VfxServer};

/// Counts runs and answers every probe with a 5 second 1280x720 clip.
#[derive(Default)]
pub struct StubEngine {
    pub runs: Mutex<usize>,
}

impl StubEngine {
    pub fn run_count(&self) -> usize {
        *self.runs.lock().unwrap()
    }
}

#[async_trait]
impl MediaEngine for StubEngine {
    async fn run(&self, _command: &FfmpegCommand) -> Result<EngineOutput> {
        *self.runs.lock().unwrap() += 1;
        Ok(EngineOutput::default())
    }

    async fn probe(&self, path: &Path) -> Result<Value> {
        Ok(json!({
            "format": {
                "filename": path.to_string_lossy(),
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                "duration": "5.000000",
                "size": "524288",
                "bit_rate": "838860",
            },
            "streams": [
                {
                    "codec_type": "video",
                    "codec_name": "h264",
                    "width": 1280,
                    "height": 720,
                    "r_frame_rate": "30000/1001",
                    "pix_fmt": "yuv420p",
                },
                {
                    "codec_type": "audio",
                    "codec_name": "aac",
                    "sample_rate": "44100",
                    "channels": 2,
                },
            ],
        }))
    }
}

/// A server wired to a fresh [`StubEngine`].
pub fn stub_server() -> (VfxServer, Arc<StubEngine>) {
    let engine = Arc::new(StubEngine::default());
    let handler = EditorHandler::with_engine(Config::default(), engine.clone());
    (VfxServer::with_handler(handler), engine)
}
