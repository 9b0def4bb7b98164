//! Error types for the common library.
//!
//! A single `thiserror` hierarchy shared by every VFX MCP crate.
//!
//! # Error Categories
//!
//! - `ConfigError`: Invalid configuration values
//! - `Error::Validation`: Tool parameters rejected before the engine runs
//! - `Error::Io`: File system and process spawn failures
//! - `Error::Ffmpeg`: Non-zero exits from ffmpeg/ffprobe, carrying stderr

use thiserror::Error;

/// Unified error type for the VFX MCP crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (invalid env values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// FFmpeg/FFprobe execution errors
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),
}

impl Error {
    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use vfx_mcp_common::error::Error;
    ///
    /// let err = Error::validation("speed: must be greater than 0");
    /// assert!(err.to_string().contains("speed"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a new FFmpeg error.
    ///
    /// # Example
    ///
    /// ```
    /// use vfx_mcp_common::error::Error;
    ///
    /// let err = Error::ffmpeg("Invalid input format");
    /// assert!(err.to_string().contains("Invalid input format"));
    /// ```
    pub fn ffmpeg(message: impl Into<String>) -> Self {
        Error::Ffmpeg(message.into())
    }

    /// Whether the error was raised while checking parameters, before any
    /// engine process was started.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_includes_var_name() {
        let err = ConfigError::invalid_value("FFMPEG_BIN", "must not be empty");
        let msg = err.to_string();
        assert!(msg.contains("FFMPEG_BIN"), "Should contain variable name");
        assert!(msg.contains("must not be empty"), "Should contain reason");
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::invalid_value("VFX_MEDIA_DIR", "not a directory").into();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_validation());
    }

    #[test]
    fn test_ffmpeg_error() {
        let err = Error::ffmpeg("Invalid codec");
        let msg = err.to_string();
        assert!(msg.contains("FFmpeg"), "Should mention FFmpeg");
        assert!(msg.contains("Invalid codec"), "Should contain message");
    }

    #[test]
    fn test_validation_error() {
        let err = Error::validation("layout: expected WxH");
        assert!(err.is_validation());
        let msg = err.to_string();
        assert!(msg.contains("Validation"), "Should mention validation");
        assert!(msg.contains("layout: expected WxH"), "Should contain message");
    }
}
