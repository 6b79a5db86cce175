//! Push-style delivery of positioned runs.
//!
//! The policy engine calls a [`RunHandler`] once per final run, in visual
//! order, bracketed by line hooks. [`BlobBuilder`] and [`LineBuilder`] are
//! the two built-in handlers behind the convenience shape calls.

pub mod blob;
pub mod line;

use core::ops::Range;

use swash::GlyphId;
use unicode_script::Script;

use crate::runs::LanguageTag;

pub use blob::{BlobBuilder, Rect, TextBlob};
pub use line::{LineBuilder, TextLine};

/// A 2D point in layout coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A glyph with its absolute position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    pub glyph_id: GlyphId,
    /// Glyph origin on the baseline, offsets applied.
    pub position: Point,
    pub x_advance: f32,
    /// Byte offset of the source cluster.
    pub cluster: u32,
}

/// One run as delivered to a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedRun<F> {
    pub font: F,
    /// Byte range in source text.
    pub text_range: Range<usize>,
    pub bidi_level: u8,
    pub script: Script,
    pub language: LanguageTag,
    /// Index of the line this run belongs to.
    pub line_index: usize,
    /// Pen position on the baseline where the run starts.
    pub origin: Point,
    /// Glyphs in visual order.
    pub glyphs: Vec<PositionedGlyph>,
    /// Total horizontal advance of the run.
    pub advance: f32,
}

impl<F> PositionedRun<F> {
    pub fn glyph_ids(&self) -> impl Iterator<Item = GlyphId> + '_ {
        self.glyphs.iter().map(|g| g.glyph_id)
    }

    pub fn is_rtl(&self) -> bool {
        self.bidi_level % 2 == 1
    }
}

/// Geometry of a committed line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineInfo {
    pub index: usize,
    /// Top edge of the line box.
    pub top: f32,
    /// Baseline position.
    pub baseline: f32,
    /// Total advance of the line's runs.
    pub width: f32,
    /// Maximum ascent of the line's runs.
    pub ascent: f32,
    /// Maximum descent of the line's runs.
    pub descent: f32,
}

impl LineInfo {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height()
    }
}

/// Receiver of shaped, positioned runs.
///
/// `run` is called exactly once per final run. For each line the calls are
/// `begin_line`, then the line's runs left to right, then `commit_line`.
pub trait RunHandler<F> {
    fn begin_line(&mut self, _index: usize) {}

    fn run(&mut self, run: PositionedRun<F>);

    fn commit_line(&mut self, _line: &LineInfo) {}
}

impl<F, H: RunHandler<F> + ?Sized> RunHandler<F> for &mut H {
    fn begin_line(&mut self, index: usize) {
        (**self).begin_line(index);
    }

    fn run(&mut self, run: PositionedRun<F>) {
        (**self).run(run);
    }

    fn commit_line(&mut self, line: &LineInfo) {
        (**self).commit_line(line);
    }
}

/// Handler that stores everything it receives.
#[derive(Debug, Clone)]
pub struct CollectingHandler<F> {
    pub runs: Vec<PositionedRun<F>>,
    pub lines: Vec<LineInfo>,
}

impl<F> CollectingHandler<F> {
    pub fn new() -> Self {
        Self {
            runs: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Runs belonging to line `index`, in visual order.
    pub fn line_runs(&self, index: usize) -> impl Iterator<Item = &PositionedRun<F>> {
        self.runs.iter().filter(move |run| run.line_index == index)
    }
}

impl<F> Default for CollectingHandler<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> RunHandler<F> for CollectingHandler<F> {
    fn run(&mut self, run: PositionedRun<F>) {
        self.runs.push(run);
    }

    fn commit_line(&mut self, line: &LineInfo) {
        self.lines.push(*line);
    }
}
