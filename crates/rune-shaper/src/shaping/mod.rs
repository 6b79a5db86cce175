//! Shaping backend contract and the bundled harfrust implementation.

pub mod hb;
pub mod options;
pub mod shaped_run;

use std::fmt;

use crate::Result;
use crate::font::ScaledFontMetrics;
use crate::intersect::IntersectedRun;

pub use hb::HarfrustBackend;
pub use options::{FontFeature, ParseFeatureError, ShapingOptions};
pub use shaped_run::{ShapedGlyph, ShapedRun};

/// Maps the codepoints of one intersected run to glyphs.
///
/// Implementations must be deterministic for a given input and must not
/// fail on unmappable codepoints: those become the font's missing glyph.
/// An error means the run could not be processed at all.
pub trait ShapingBackend {
    /// Font handle carried by font runs.
    type Font: Clone + PartialEq + fmt::Debug;

    /// Shape `text`, the slice of the source covered by `run.range`.
    ///
    /// Returned glyphs are in logical order, clusters are absolute byte
    /// offsets into the source text.
    fn shape_run(
        &self,
        text: &str,
        run: &IntersectedRun<Self::Font>,
        options: &ShapingOptions,
    ) -> Result<ShapedRun>;

    /// Whether `font` has a glyph for `ch`.
    fn has_glyph(&self, font: &Self::Font, ch: char) -> bool;

    /// Line metrics of `font` in pixels.
    fn metrics(&self, font: &Self::Font) -> ScaledFontMetrics;
}

impl<B: ShapingBackend + ?Sized> ShapingBackend for &B {
    type Font = B::Font;

    fn shape_run(
        &self,
        text: &str,
        run: &IntersectedRun<Self::Font>,
        options: &ShapingOptions,
    ) -> Result<ShapedRun> {
        (**self).shape_run(text, run, options)
    }

    fn has_glyph(&self, font: &Self::Font, ch: char) -> bool {
        (**self).has_glyph(font, ch)
    }

    fn metrics(&self, font: &Self::Font) -> ScaledFontMetrics {
        (**self).metrics(font)
    }
}
