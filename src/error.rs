use thiserror::Error;

/// Main error type for the Retro-Tape library
#[derive(Error, Debug)]
pub enum TapeError {
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Style processing error: {0}")]
    Style(#[from] StyleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Processing cancelled after {completed} frames")]
    Cancelled { completed: usize },

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Frame-shape errors, raised before any stage runs
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid frame dimensions: {details}")]
    InvalidDimension { details: String },

    #[error("Frame {index} failed: {reason}")]
    ProcessingFailed { index: usize, reason: String },
}

/// Style parameter errors
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("Unknown tape speed preset: {name} (expected SP, LP or EP)")]
    InvalidPreset { name: String },

    #[error("Invalid style parameter: {key} = {value}")]
    InvalidParameter { key: String, value: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} ({reason})")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid parameter JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using TapeError
pub type Result<T> = std::result::Result<T, TapeError>;

impl TapeError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Shorthand for a frame shape mismatch
    pub fn invalid_dimension<S: Into<String>>(details: S) -> Self {
        Self::Frame(FrameError::InvalidDimension { details: details.into() })
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO errors might be temporary
            Self::Io(_) => true,
            // A cancelled batch can simply be resubmitted
            Self::Cancelled { .. } => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Style(StyleError::InvalidPreset { name }) => {
                format!("Tape speed '{}' is not supported. Available presets: SP, LP, EP", name)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Frame(FrameError::InvalidDimension { details }) => {
                format!("The frame could not be processed: {}", details)
            }
            _ => self.to_string(),
        }
    }
}
