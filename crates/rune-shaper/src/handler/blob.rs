use super::{LineInfo, Point, PositionedRun, RunHandler};

/// Immutable collection of positioned glyph runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlob<F> {
    runs: Vec<PositionedRun<F>>,
    lines: Vec<LineInfo>,
}

/// Axis-aligned bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

impl<F> TextBlob<F> {
    pub fn runs(&self) -> &[PositionedRun<F>] {
        &self.runs
    }

    pub fn lines(&self) -> &[LineInfo] {
        &self.lines
    }

    pub fn glyph_count(&self) -> usize {
        self.runs.iter().map(|run| run.glyphs.len()).sum()
    }

    /// Union of the line boxes, using run origins for the horizontal extent.
    pub fn bounds(&self) -> Rect {
        let mut rect = Rect {
            left: f32::INFINITY,
            top: f32::INFINITY,
            right: f32::NEG_INFINITY,
            bottom: f32::NEG_INFINITY,
        };
        for run in &self.runs {
            rect.left = rect.left.min(run.origin.x);
            rect.right = rect.right.max(run.origin.x + run.advance);
        }
        for line in &self.lines {
            rect.top = rect.top.min(line.top);
            rect.bottom = rect.bottom.max(line.bottom());
        }
        rect
    }
}

/// Handler accumulating runs into a [`TextBlob`], shifted by an offset.
#[derive(Debug, Clone)]
pub struct BlobBuilder<F> {
    offset: Point,
    runs: Vec<PositionedRun<F>>,
    lines: Vec<LineInfo>,
}

impl<F> BlobBuilder<F> {
    pub fn new(offset: Point) -> Self {
        Self {
            offset,
            runs: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// The assembled blob, or `None` if no glyph was produced.
    pub fn finish(self) -> Option<TextBlob<F>> {
        if self.runs.iter().all(|run| run.glyphs.is_empty()) {
            return None;
        }
        Some(TextBlob {
            runs: self.runs,
            lines: self.lines,
        })
    }
}

impl<F> RunHandler<F> for BlobBuilder<F> {
    fn run(&mut self, mut run: PositionedRun<F>) {
        let Point { x: dx, y: dy } = self.offset;
        run.origin.x += dx;
        run.origin.y += dy;
        for glyph in &mut run.glyphs {
            glyph.position.x += dx;
            glyph.position.y += dy;
        }
        self.runs.push(run);
    }

    fn commit_line(&mut self, line: &LineInfo) {
        let mut line = *line;
        line.top += self.offset.y;
        line.baseline += self.offset.y;
        self.lines.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::PositionedGlyph;
    use crate::runs::LanguageTag;
    use unicode_script::Script;

    fn run(glyphs: usize, x: f32) -> PositionedRun<u8> {
        PositionedRun {
            font: 0,
            text_range: 0..glyphs,
            bidi_level: 0,
            script: Script::Latin,
            language: LanguageTag::new("en"),
            line_index: 0,
            origin: Point::new(x, 8.0),
            glyphs: (0..glyphs)
                .map(|i| PositionedGlyph {
                    glyph_id: 1,
                    position: Point::new(x + i as f32, 8.0),
                    x_advance: 1.0,
                    cluster: i as u32,
                })
                .collect(),
            advance: glyphs as f32,
        }
    }

    fn line() -> LineInfo {
        LineInfo {
            index: 0,
            top: 0.0,
            baseline: 8.0,
            width: 3.0,
            ascent: 8.0,
            descent: 2.0,
        }
    }

    #[test]
    fn empty_builder_yields_none() {
        assert!(BlobBuilder::<u8>::new(Point::ZERO).finish().is_none());
        let mut builder = BlobBuilder::new(Point::ZERO);
        builder.run(run(0, 0.0));
        assert!(builder.finish().is_none());
    }

    #[test]
    fn offset_shifts_every_position() {
        let mut builder = BlobBuilder::new(Point::new(10.0, 20.0));
        builder.begin_line(0);
        builder.run(run(3, 0.0));
        builder.commit_line(&line());
        let blob = builder.finish().unwrap();
        assert_eq!(blob.glyph_count(), 3);
        assert_eq!(blob.runs()[0].origin, Point::new(10.0, 28.0));
        assert_eq!(blob.runs()[0].glyphs[2].position, Point::new(12.0, 28.0));
        let bounds = blob.bounds();
        assert_eq!(bounds.left, 10.0);
        assert_eq!(bounds.right, 13.0);
        assert_eq!(bounds.top, 20.0);
        assert_eq!(bounds.height(), 10.0);
    }
}
