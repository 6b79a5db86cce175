//! Error types for the shaping engine.

use thiserror::Error;

use crate::font::FontError;

/// Result type for shaping operations.
pub type Result<T> = std::result::Result<T, ShapeError>;

/// Name of the classification stream a [`ConfigError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Font,
    Bidi,
    Script,
    Language,
}

impl std::fmt::Display for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stream::Font => "font",
            Stream::Bidi => "bidi",
            Stream::Script => "script",
            Stream::Language => "language",
        })
    }
}

/// Invalid input to a shaper. Never recovered from inside the engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Width budget is zero, negative or NaN.
    #[error("invalid width {0}: must be positive or infinite")]
    InvalidWidth(f32),

    /// A classification stream reported an empty range.
    #[error("{stream} stream reported an empty run at byte {at}")]
    EmptyRun { stream: Stream, at: usize },

    /// A classification stream skipped or overlapped part of the text.
    #[error("{stream} stream expected a run starting at byte {expected}, found {found}")]
    Gap {
        stream: Stream,
        expected: usize,
        found: usize,
    },

    /// A classification stream ran past the end of the text.
    #[error("{stream} stream run ends at byte {end}, past text length {len}")]
    PastEnd {
        stream: Stream,
        end: usize,
        len: usize,
    },

    /// A classification stream ended before covering the whole text.
    #[error("{stream} stream ended at byte {at} before the end of the text")]
    Exhausted { stream: Stream, at: usize },

    /// A run boundary does not fall on a character boundary of the text.
    #[error("run {0:?} does not fall on character boundaries")]
    Misaligned(core::ops::Range<usize>),

    /// Bidi embedding level above the UAX #9 maximum depth.
    #[error("invalid bidi level {0}")]
    InvalidBidiLevel(u8),

    /// A platform-only strategy was requested where it does not exist.
    #[error("{0} shaping is not available on this platform")]
    PlatformUnavailable(&'static str),
}

/// Errors surfaced by a shape call.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// Caller supplied invalid configuration or classification streams.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The backend could not process a run at all (e.g. corrupt font data).
    #[error("shaping backend failed: {0}")]
    Backend(String),

    /// Font loading failed.
    #[error("font error: {0}")]
    Font(#[from] FontError),
}

impl ShapeError {
    /// Whether this error belongs to the configuration class.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ShapeError::Configuration(_))
    }
}
