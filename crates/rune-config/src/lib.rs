//! Configuration for the rune shaping tools.
//!
//! Settings are read from `rune.toml`, with environment variables taking
//! precedence over file values.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "rune.toml";

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RuneConfig {
    /// Font and size settings
    pub text: TextConfig,
    /// Shaping strategy and layout settings
    pub shaper: ShaperConfig,
}

/// Text configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Path to the primary font file (.ttf/.otf)
    pub font: Option<PathBuf>,
    /// Face index inside a font collection
    pub font_index: usize,
    /// Text size in pixels
    pub text_size: f32,
    /// Families looked up in the system font database for fallback
    pub fallback_families: Vec<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font: None,
            font_index: 0,
            text_size: 16.0,
            fallback_families: Vec::new(),
        }
    }
}

/// Shaping strategy as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyName {
    /// Whatever the shaper library considers its default (shape then wrap)
    #[default]
    Default,
    Primitive,
    ShaperDrivenWrap,
    ShapeThenWrap,
    ShapeNoWrapNoReorder,
    PlatformNative,
}

impl StrategyName {
    /// Parse the kebab-case name used in files and environment variables.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "default" => StrategyName::Default,
            "primitive" => StrategyName::Primitive,
            "shaper-driven-wrap" => StrategyName::ShaperDrivenWrap,
            "shape-then-wrap" => StrategyName::ShapeThenWrap,
            "shape-no-wrap-no-reorder" => StrategyName::ShapeNoWrapNoReorder,
            "platform-native" => StrategyName::PlatformNative,
            _ => return None,
        })
    }
}

/// Shaper configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShaperConfig {
    pub strategy: StrategyName,
    /// Line width in pixels; unbounded when absent
    pub width: Option<f32>,
    /// Right-to-left paragraph direction
    pub right_to_left: bool,
    /// OpenType features, e.g. "liga=0" or "+smcp"
    pub features: Vec<String>,
    /// BCP 47 language tag overriding the process locale
    pub language: Option<String>,
    /// Offset applied to every emitted glyph position
    pub offset_x: f32,
    pub offset_y: f32,
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

impl RuneConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `rune.toml` from the current directory, or defaults if it is
    /// missing or unreadable.
    pub fn load_or_default() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_FILE).unwrap_or_default()
    }

    /// Override values from the process environment.
    pub fn merge_with_env(&mut self) {
        self.merge_with(|name| std::env::var(name).ok());
    }

    /// Override values from `lookup`, called with each variable name.
    /// Unparseable values are ignored.
    pub fn merge_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(font) = lookup("RUNE_TEXT_FONT") {
            self.text.font = Some(PathBuf::from(font));
        }
        if let Some(size) = lookup("RUNE_TEXT_SIZE").and_then(|val| val.parse().ok()) {
            self.text.text_size = size;
        }
        if let Some(strategy) =
            lookup("RUNE_SHAPER_STRATEGY").and_then(|val| StrategyName::parse(&val))
        {
            self.shaper.strategy = strategy;
        }
        if let Some(val) = lookup("RUNE_SHAPE_WIDTH") {
            // "inf" or an empty value clears the width.
            self.shaper.width = val.parse::<f32>().ok().filter(|w| w.is_finite());
        }
        if let Some(val) = lookup("RUNE_SHAPE_RTL") {
            self.shaper.right_to_left = parse_flag(&val);
        }
        if let Some(language) = lookup("RUNE_SHAPE_LANGUAGE") {
            self.shaper.language = Some(language).filter(|tag| !tag.is_empty());
        }
    }

    /// Load `rune.toml` (or defaults), then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
