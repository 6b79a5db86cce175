#![allow(dead_code)]

use std::ops::Range;
use std::sync::Mutex;

use rune_shaper::{
    FontProvider, IntersectedRun, PositionedRun, Result, ScaledFontMetrics, ShapeError,
    ShapedGlyph, ShapedRun, ShapingBackend, ShapingOptions,
};

pub const ADVANCE: f32 = 10.0;

/// Which codepoints a test font maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    All,
    Ascii,
    NonAscii,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestFont {
    pub id: u16,
    pub ascent: f32,
    pub descent: f32,
    pub coverage: Coverage,
}

impl TestFont {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            ascent: 8.0,
            descent: 2.0,
            coverage: Coverage::All,
        }
    }

    pub fn covering(id: u16, coverage: Coverage) -> Self {
        Self {
            coverage,
            ..Self::new(id)
        }
    }

    pub fn with_metrics(mut self, ascent: f32, descent: f32) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    pub fn covers(&self, ch: char) -> bool {
        match self.coverage {
            Coverage::All => true,
            Coverage::Ascii => ch.is_ascii(),
            Coverage::NonAscii => !ch.is_ascii(),
        }
    }
}

/// Glyph id the test backend assigns to a covered codepoint.
pub fn glyph_for(ch: char) -> u16 {
    (ch as u32 % 1000) as u16 + 1
}

pub fn is_mark(ch: char) -> bool {
    ('\u{300}'..='\u{36f}').contains(&ch)
}

/// Deterministic backend: one glyph per codepoint with a fixed advance.
/// Combining marks have no advance and join the previous cluster.
#[derive(Debug, Default)]
pub struct TestBackend {
    pub fail_on: Option<char>,
    calls: Mutex<Vec<Range<usize>>>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(ch: char) -> Self {
        Self {
            fail_on: Some(ch),
            ..Self::default()
        }
    }

    /// Ranges passed to `shape_run`, in call order.
    pub fn calls(&self) -> Vec<Range<usize>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl ShapingBackend for TestBackend {
    type Font = TestFont;

    fn shape_run(
        &self,
        text: &str,
        run: &IntersectedRun<TestFont>,
        _options: &ShapingOptions,
    ) -> Result<ShapedRun> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(run.range.clone());
        }
        if let Some(bad) = self.fail_on
            && text.contains(bad)
        {
            return Err(ShapeError::Backend(format!("cannot shape {bad:?}")));
        }

        let mut glyphs: Vec<ShapedGlyph> = Vec::new();
        for (offset, ch) in text.char_indices() {
            let mut cluster = (run.range.start + offset) as u32;
            let mut x_advance = ADVANCE;
            if is_mark(ch)
                && let Some(prev) = glyphs.last()
            {
                cluster = prev.cluster;
                x_advance = 0.0;
            }
            glyphs.push(ShapedGlyph {
                glyph_id: if run.font.covers(ch) { glyph_for(ch) } else { 0 },
                x_advance,
                y_advance: 0.0,
                x_offset: 0.0,
                y_offset: 0.0,
                cluster,
            });
        }
        Ok(ShapedRun::new(run.range.clone(), glyphs, run.bidi_level))
    }

    fn has_glyph(&self, font: &TestFont, ch: char) -> bool {
        font.covers(ch)
    }

    fn metrics(&self, font: &TestFont) -> ScaledFontMetrics {
        ScaledFontMetrics {
            ascent: font.ascent,
            descent: font.descent,
            line_gap: 0.0,
            font_size: 10.0,
        }
    }
}

/// Provider offering a single fallback font.
#[derive(Debug, Clone)]
pub struct SingleFallback(pub TestFont);

impl FontProvider<TestFont> for SingleFallback {
    fn fallback_for(&self, ch: char, _requested: &TestFont) -> Option<TestFont> {
        self.0.covers(ch).then(|| self.0.clone())
    }
}

pub fn ranges(runs: &[PositionedRun<TestFont>]) -> Vec<Range<usize>> {
    runs.iter().map(|run| run.text_range.clone()).collect()
}

pub fn glyph_ids(runs: &[PositionedRun<TestFont>]) -> Vec<u16> {
    runs.iter().flat_map(|run| run.glyph_ids()).collect()
}

pub fn advances(runs: &[PositionedRun<TestFont>]) -> Vec<f32> {
    runs.iter()
        .flat_map(|run| run.glyphs.iter().map(|g| g.x_advance))
        .collect()
}
