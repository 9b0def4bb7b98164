//! Subprocess execution of ffmpeg and ffprobe.
//!
//! Tool handlers talk to the engine through the [`MediaEngine`] trait so that
//! command construction can be exercised without spawning processes.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;
use vfx_mcp_common::config::Config;
use vfx_mcp_common::error::{Error, Result};

use crate::command::FfmpegCommand;

/// Captured output of a successful engine run.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub stdout: String,
    pub stderr: String,
}

/// The external media engine.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Run ffmpeg with the given arguments; output files are overwritten.
    async fn run(&self, command: &FfmpegCommand) -> Result<EngineOutput>;

    /// Probe a file and return ffprobe's JSON (`-show_format -show_streams`).
    async fn probe(&self, path: &Path) -> Result<serde_json::Value>;
}

/// [`MediaEngine`] backed by the ffmpeg/ffprobe executables.
#[derive(Debug, Clone)]
pub struct FfmpegEngine {
    ffmpeg_bin: String,
    ffprobe_bin: String,
}

impl FfmpegEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            ffmpeg_bin: config.ffmpeg_bin.clone(),
            ffprobe_bin: config.ffprobe_bin.clone(),
        }
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

/// Pick the most useful diagnostic from a failed process.
fn failure_message(stderr: &[u8], stdout: &[u8], status: std::process::ExitStatus) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    let stdout = String::from_utf8_lossy(stdout);
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        return stdout.to_string();
    }
    format!("process exited with {}", status)
}

#[async_trait]
impl MediaEngine for FfmpegEngine {
    async fn run(&self, command: &FfmpegCommand) -> Result<EngineOutput> {
        debug!(command = %command, "Running ffmpeg");

        let output = Command::new(&self.ffmpeg_bin)
            .args(["-hide_banner", "-y"])
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::ffmpeg(format!(
                "ffmpeg failed: {}",
                failure_message(&output.stderr, &output.stdout, output.status)
            )));
        }

        Ok(EngineOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn probe(&self, path: &Path) -> Result<serde_json::Value> {
        debug!(path = %path.display(), "Running ffprobe");

        let output = Command::new(&self.ffprobe_bin)
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(Error::ffmpeg(format!(
                "ffprobe failed for '{}': {}",
                path.display(),
                failure_message(&output.stderr, &output.stdout, output.status)
            )));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| Error::ffmpeg(format!("Failed to parse ffprobe output: {}", e)))
    }
}
