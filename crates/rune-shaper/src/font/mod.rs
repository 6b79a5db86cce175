pub mod face;
pub mod loader;
pub mod metrics;

use std::sync::Arc;

use swash::GlyphId;

pub use face::FontFace;
pub use loader::{FontCache, FontCollection, FontKey};
pub use metrics::{FontMetrics, ScaledFontMetrics};

/// Errors that can occur while working with fonts.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data")]
    InvalidFont,
    #[error("font family not found: {0}")]
    NotFound(String),
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;

/// A face at a pixel size, as assigned to runs by the font stream.
///
/// Two handles are equal when they share the same loaded face, size and
/// missing-glyph id.
#[derive(Debug, Clone)]
pub struct FontHandle {
    face: Arc<FontFace>,
    size: f32,
    missing_glyph: GlyphId,
}

impl FontHandle {
    pub fn new(face: Arc<FontFace>, size: f32) -> Self {
        Self {
            face,
            size,
            missing_glyph: 0,
        }
    }

    /// Glyph substituted for codepoints the face cannot map.
    pub fn with_missing_glyph(mut self, glyph: GlyphId) -> Self {
        self.missing_glyph = glyph;
        self
    }

    pub fn face(&self) -> &Arc<FontFace> {
        &self.face
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn missing_glyph(&self) -> GlyphId {
        self.missing_glyph
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.face, &other.face)
            && self.size == other.size
            && self.missing_glyph == other.missing_glyph
    }
}
