//! Configuration module for loading environment variables and settings.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default ffmpeg executable, resolved through `PATH`.
pub const DEFAULT_FFMPEG_BIN: &str = "ffmpeg";

/// Default ffprobe executable, resolved through `PATH`.
pub const DEFAULT_FFPROBE_BIN: &str = "ffprobe";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned by the `videos://` resources
    pub media_dir: PathBuf,
    /// ffmpeg executable name or path
    pub ffmpeg_bin: String,
    /// ffprobe executable name or path
    pub ffprobe_bin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("."),
            ffmpeg_bin: DEFAULT_FFMPEG_BIN.to_string(),
            ffprobe_bin: DEFAULT_FFPROBE_BIN.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `VFX_MEDIA_DIR` | `.` |
    /// | `FFMPEG_BIN` | `ffmpeg` |
    /// | `FFPROBE_BIN` | `ffprobe` |
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if a binary is set to an empty
    /// string or `VFX_MEDIA_DIR` is not a directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let media_dir = match lookup("VFX_MEDIA_DIR") {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if !dir.is_dir() {
                    return Err(ConfigError::invalid_value(
                        "VFX_MEDIA_DIR",
                        format!("'{}' is not a directory", dir.display()),
                    ));
                }
                dir
            }
            None => PathBuf::from("."),
        };

        let ffmpeg_bin = binary(&lookup, "FFMPEG_BIN", DEFAULT_FFMPEG_BIN)?;
        let ffprobe_bin = binary(&lookup, "FFPROBE_BIN", DEFAULT_FFPROBE_BIN)?;

        Ok(Self {
            media_dir,
            ffmpeg_bin,
            ffprobe_bin,
        })
    }

    /// Resolve a file name against the media directory.
    ///
    /// Absolute paths are returned unchanged.
    pub fn media_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.media_dir.join(path)
        }
    }
}

fn binary<F>(lookup: &F, name: &str, default: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if value.trim().is_empty() => {
            Err(ConfigError::invalid_value(name, "must not be empty"))
        }
        Some(value) => Ok(value),
        None => Ok(default.to_string()),
    }
}
