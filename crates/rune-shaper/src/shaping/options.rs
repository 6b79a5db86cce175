use std::fmt;
use std::str::FromStr;

/// OpenType feature setting applied to every run of a shape call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontFeature {
    pub tag: [u8; 4],
    pub value: u32,
}

impl FontFeature {
    pub const fn new(tag: &[u8; 4], value: u32) -> Self {
        Self { tag: *tag, value }
    }
}

/// Error parsing a feature string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid font feature {0:?}")]
pub struct ParseFeatureError(pub String);

impl FromStr for FontFeature {
    type Err = ParseFeatureError;

    /// Accepts `tag`, `+tag`, `-tag` and `tag=value`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseFeatureError(s.to_string());
        let s = s.trim();
        let (name, value) = if let Some(name) = s.strip_prefix('-') {
            (name, 0)
        } else if let Some((name, value)) = s.split_once('=') {
            (name.trim(), value.trim().parse().map_err(|_| err())?)
        } else {
            (s.strip_prefix('+').unwrap_or(s), 1)
        };
        let tag: [u8; 4] = name.as_bytes().try_into().map_err(|_| err())?;
        if !tag.iter().all(|b| b.is_ascii_graphic()) {
            return Err(err());
        }
        Ok(Self { tag, value })
    }
}

impl fmt::Display for FontFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = String::from_utf8_lossy(&self.tag);
        write!(f, "{tag}={}", self.value)
    }
}

/// Immutable per-call shaping configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapingOptions {
    /// Paragraph base direction used by the default bidi stream.
    pub right_to_left: bool,
    /// Features applied to every run.
    pub features: Vec<FontFeature>,
    /// Round emitted glyph positions to whole pixels.
    pub round_positions: bool,
}

impl ShapingOptions {
    pub fn rtl() -> Self {
        Self {
            right_to_left: true,
            ..Self::default()
        }
    }

    pub fn with_features(mut self, features: impl IntoIterator<Item = FontFeature>) -> Self {
        self.features.extend(features);
        self
    }

    pub fn with_rounding(mut self, round: bool) -> Self {
        self.round_positions = round;
        self
    }

    pub fn is_left_to_right(&self) -> bool {
        !self.right_to_left
    }
}
