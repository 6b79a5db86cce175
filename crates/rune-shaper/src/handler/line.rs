use super::{LineInfo, PositionedRun, RunHandler};

/// A single shaped line of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine<F> {
    /// Total advance width.
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
    /// Runs in visual order.
    pub runs: Vec<PositionedRun<F>>,
}

impl<F> TextLine<F> {
    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    pub fn glyph_count(&self) -> usize {
        self.runs.iter().map(|run| run.glyphs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Handler assembling one line into a [`TextLine`]. Runs and geometry of
/// any line after the first are ignored.
#[derive(Debug, Clone)]
pub struct LineBuilder<F> {
    line: TextLine<F>,
    lines_seen: usize,
}

impl<F> LineBuilder<F> {
    /// `ascent` and `descent` are reported for text that produces no line.
    pub fn new(ascent: f32, descent: f32) -> Self {
        Self {
            line: TextLine {
                width: 0.0,
                ascent,
                descent,
                runs: Vec::new(),
            },
            lines_seen: 0,
        }
    }

    pub fn finish(self) -> TextLine<F> {
        self.line
    }
}

impl<F> RunHandler<F> for LineBuilder<F> {
    fn run(&mut self, run: PositionedRun<F>) {
        if self.lines_seen == 0 {
            self.line.runs.push(run);
        }
    }

    fn commit_line(&mut self, line: &LineInfo) {
        if self.lines_seen == 0 {
            self.line.width = line.width;
            self.line.ascent = line.ascent;
            self.line.descent = line.descent;
        }
        self.lines_seen += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untouched_builder_is_zero_run_line() {
        let line = LineBuilder::<u8>::new(12.0, 3.0).finish();
        assert!(line.is_empty());
        assert_eq!(line.width, 0.0);
        assert_eq!(line.height(), 15.0);
    }

    #[test]
    fn commit_takes_line_geometry() {
        let mut builder = LineBuilder::<u8>::new(12.0, 3.0);
        builder.begin_line(0);
        builder.commit_line(&LineInfo {
            index: 0,
            top: 0.0,
            baseline: 14.0,
            width: 42.0,
            ascent: 14.0,
            descent: 4.0,
        });
        let line = builder.finish();
        assert_eq!(line.width, 42.0);
        assert_eq!(line.ascent, 14.0);
        assert_eq!(line.descent, 4.0);
    }

    #[test]
    fn second_line_is_ignored() {
        let info = |index, width| LineInfo {
            index,
            top: 0.0,
            baseline: 8.0,
            width,
            ascent: 8.0,
            descent: 2.0,
        };
        let mut builder = LineBuilder::<u8>::new(12.0, 3.0);
        builder.begin_line(0);
        builder.commit_line(&info(0, 30.0));
        builder.begin_line(1);
        builder.commit_line(&info(1, 99.0));
        let line = builder.finish();
        assert_eq!(line.width, 30.0);
        assert_eq!(line.ascent, 8.0);
    }
}
